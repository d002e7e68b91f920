//! Duration measurement with overhead compensation.

mod duration;
mod measurer;

pub use duration::{Duration, DurationSum, MeanDuration};
pub use measurer::DurationMeasurer;
