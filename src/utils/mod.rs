//! Platform helpers and output.

pub mod cpu_affinity;
pub mod cpu_info;
pub mod cycles;
pub mod priority;
pub mod report;
pub mod tui;

// Re-export commonly used items
pub use cpu_affinity::CpuPinGuard;
pub use cpu_info::{cpu_model, sample_frequency_mhz};
pub use cycles::read_cycles;
pub use priority::elevate_priority;
pub use report::export_csv;
