//! Self-calibrating dual timer.

use std::hint::black_box;
use std::sync::atomic::{compiler_fence, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use super::duration::{Duration, DurationSum};
use crate::utils::cycles::read_cycles;

/// Measures a unit of work in cycles and wall-clock seconds at the same time,
/// optionally subtracting the fixed cost of the measurement itself.
///
/// The overhead baseline is zero until [`calibrate`](Self::calibrate) runs.
#[derive(Clone, Debug)]
pub struct DurationMeasurer {
    overhead: Duration,
    calibration_samples: usize,
}

impl DurationMeasurer {
    /// Empty measurements averaged by [`calibrate`](Self::calibrate), after an equal warm-up batch.
    pub const DEFAULT_CALIBRATION_SAMPLES: usize = 1 << 16;

    pub fn new() -> Self {
        Self::with_calibration_samples(Self::DEFAULT_CALIBRATION_SAMPLES)
    }

    pub fn with_calibration_samples(samples: usize) -> Self {
        Self {
            overhead: Duration::ZERO,
            calibration_samples: samples.max(1),
        }
    }

    /// A measurer with a fixed, externally chosen overhead baseline.
    pub fn with_overhead(overhead: Duration) -> Self {
        Self {
            overhead,
            calibration_samples: Self::DEFAULT_CALIBRATION_SAMPLES,
        }
    }

    pub fn overhead(&self) -> Duration {
        self.overhead
    }

    /// Time one call of `work`.
    ///
    /// With `compensate`, the calibrated overhead is subtracted from both fields,
    /// clamping at zero.
    #[inline(always)]
    pub fn measure<F: FnOnce()>(&self, work: F, compensate: bool) -> Duration {
        let wall_begin = Instant::now();
        let begin = black_box(read_cycles());
        compiler_fence(Ordering::SeqCst);

        work();

        compiler_fence(Ordering::SeqCst);
        let end = black_box(read_cycles());
        let wall_end = Instant::now();

        let raw = Duration {
            cycles: end.saturating_sub(begin),
            seconds: wall_end.duration_since(wall_begin).as_secs_f64(),
        };

        if compensate {
            self.compensate(raw)
        } else {
            raw
        }
    }

    /// Remove the overhead baseline from a raw measurement.
    pub fn compensate(&self, raw: Duration) -> Duration {
        raw.saturating_sub(self.overhead)
    }

    /// Measure the empty workload many times and store the mean as the new overhead.
    ///
    /// Calibration never compensates its own samples. Returns the stored baseline.
    pub fn calibrate(&mut self) -> Duration {
        let n = self.calibration_samples;

        for _ in 0..n {
            black_box(self.measure(|| {}, false));
        }

        let sum: DurationSum = (0..n).map(|_| self.measure(|| {}, false)).collect();
        self.overhead = sum.mean().to_duration();

        info!(
            cycles = self.overhead.cycles,
            nanos = self.overhead.seconds * 1.0e9,
            samples = n,
            "calibrated measurement overhead"
        );
        debug!(mean_cycles = sum.mean().cycles, "unrounded overhead");

        self.overhead
    }
}

impl Default for DurationMeasurer {
    fn default() -> Self {
        Self::new()
    }
}
