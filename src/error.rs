//! Error types shared by buffers, the benchmark engine and the environment helpers.

use thiserror::Error;

/// Errors produced while preparing or running a measurement.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Allocation of a benchmark buffer failed.
    #[error("could not allocate {size} bytes of benchmark data")]
    OutOfMemory {
        /// Requested byte count.
        size: usize,
    },

    /// The buffers handed to the engine cannot hold the requested layout.
    #[error("invalid buffer size: {reason} (source {source_len} bytes, working {work_len} bytes)")]
    InvalidBufferSize {
        source_len: usize,
        work_len: usize,
        reason: &'static str,
    },

    /// Sampling parameters that cannot produce a measurement.
    #[error("invalid engine configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    /// The buffer size is not a whole number of packs.
    #[error("buffer size {size} is not a multiple of the {pack_bytes}-byte pack")]
    MisalignedBufferSize { size: usize, pack_bytes: usize },

    /// An OS-level helper (priority, CPU identification, frequency sampling) failed.
    /// Never fatal: measurements continue with whatever the OS gives us.
    #[error("environment failure: {0}")]
    EnvironmentFailure(String),

    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
