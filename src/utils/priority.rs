//! Scheduling priority of the benchmark process.

use crate::error::{BenchError, Result};

/// Niceness requested before measuring; the most favourable value Unix allows.
pub const HIGH_PRIORITY: i32 = -20;

/// Ask the OS to schedule this process ahead of everything else.
///
/// Usually needs elevated privileges. Callers log the error and keep going:
/// results stay valid, only noisier.
pub fn elevate_priority() -> Result<()> {
    set_niceness(HIGH_PRIORITY)
}

#[cfg(unix)]
fn set_niceness(nice: i32) -> Result<()> {
    // SAFETY: plain syscall on the calling process.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, nice) };
    if rc == 0 {
        Ok(())
    } else {
        Err(BenchError::EnvironmentFailure(format!(
            "setpriority({}) failed: {}",
            nice,
            std::io::Error::last_os_error()
        )))
    }
}

#[cfg(not(unix))]
fn set_niceness(_nice: i32) -> Result<()> {
    Err(BenchError::EnvironmentFailure(
        "priority elevation is not supported on this platform".to_string(),
    ))
}
