//! Pinning the measuring thread to a single core.
//!
//! Migrating between cores mid-sample mixes two cycle counters and two cache
//! hierarchies into one measurement, so the runner pins for the whole sweep.
//! Only Linux enforces affinity; elsewhere pinning reports an environment failure.

use crate::error::{BenchError, Result};

#[cfg(target_os = "linux")]
mod platform {
    use std::io;
    use std::mem;

    pub type Mask = libc::cpu_set_t;

    pub fn current_cpu() -> Option<usize> {
        // SAFETY: no arguments, returns -1 on failure.
        let cpu = unsafe { libc::sched_getcpu() };
        usize::try_from(cpu).ok()
    }

    pub fn get_mask() -> io::Result<Mask> {
        // SAFETY: cpu_set_t is plain data; the kernel fills it.
        unsafe {
            let mut set: Mask = mem::zeroed();
            if libc::sched_getaffinity(0, mem::size_of::<Mask>(), &mut set) == 0 {
                Ok(set)
            } else {
                Err(io::Error::last_os_error())
            }
        }
    }

    pub fn set_mask(set: &Mask) -> io::Result<()> {
        // SAFETY: `set` is a valid, initialized mask.
        if unsafe { libc::sched_setaffinity(0, mem::size_of::<Mask>(), set) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub fn single_core(core: usize) -> Mask {
        // SAFETY: zeroed cpu_set_t is the empty set; CPU_SET bounds-checks.
        unsafe {
            let mut set: Mask = mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core, &mut set);
            set
        }
    }
}

/// Core the calling thread is running on, where the OS can tell.
pub fn current_cpu() -> Option<usize> {
    #[cfg(target_os = "linux")]
    {
        platform::current_cpu()
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Keeps the thread on one core; restores the previous affinity on drop.
pub struct CpuPinGuard {
    #[cfg(target_os = "linux")]
    previous: platform::Mask,
    core: usize,
}

impl CpuPinGuard {
    /// Pin to whichever core the thread is on now.
    pub fn pin_current() -> Result<Self> {
        let core = current_cpu().ok_or_else(|| {
            BenchError::EnvironmentFailure("cannot determine current CPU".to_string())
        })?;
        Self::pin_to(core)
    }

    #[cfg(target_os = "linux")]
    pub fn pin_to(core: usize) -> Result<Self> {
        let failure = |what: &str, e: std::io::Error| {
            BenchError::EnvironmentFailure(format!("{} (core {}): {}", what, core, e))
        };
        let previous = platform::get_mask().map_err(|e| failure("sched_getaffinity", e))?;
        platform::set_mask(&platform::single_core(core))
            .map_err(|e| failure("sched_setaffinity", e))?;
        Ok(Self { previous, core })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn pin_to(core: usize) -> Result<Self> {
        Err(BenchError::EnvironmentFailure(format!(
            "CPU affinity is not supported on this platform (core {})",
            core
        )))
    }

    pub fn core(&self) -> usize {
        self.core
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        #[cfg(target_os = "linux")]
        if let Err(e) = platform::set_mask(&self.previous) {
            tracing::warn!(error = %e, "failed to restore CPU affinity");
        }
    }
}
