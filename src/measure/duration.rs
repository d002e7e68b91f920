//! Cycle + wall-clock durations and their averages.

/// Net elapsed time of one measured unit of work, in both counter and wall-clock units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Duration {
    pub cycles: u64,
    pub seconds: f64,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        cycles: 0,
        seconds: 0.0,
    };

    /// Cycles per second, or `None` when no wall-clock time elapsed.
    pub fn inferred_frequency(&self) -> Option<f64> {
        frequency(self.cycles as f64, self.seconds)
    }

    pub fn inferred_frequency_mhz(&self) -> Option<f64> {
        self.inferred_frequency().map(|hz| hz / 1.0e6)
    }

    /// Field-wise subtraction clamped at zero.
    pub fn saturating_sub(self, other: Duration) -> Duration {
        Duration {
            cycles: self.cycles.saturating_sub(other.cycles),
            seconds: (self.seconds - other.seconds).max(0.0),
        }
    }
}

fn frequency(cycles: f64, seconds: f64) -> Option<f64> {
    (seconds > 0.0).then(|| cycles / seconds)
}

/// Pointwise arithmetic mean of a set of [`Duration`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeanDuration {
    pub cycles: f64,
    pub seconds: f64,
}

impl MeanDuration {
    /// Frequency of the averaged fields, not the average of per-sample frequencies.
    pub fn inferred_frequency(&self) -> Option<f64> {
        frequency(self.cycles, self.seconds)
    }

    pub fn inferred_frequency_mhz(&self) -> Option<f64> {
        self.inferred_frequency().map(|hz| hz / 1.0e6)
    }

    /// Truncate to whole cycles.
    pub fn to_duration(self) -> Duration {
        Duration {
            cycles: self.cycles as u64,
            seconds: self.seconds,
        }
    }
}

/// Running sum used to average many samples without storing them.
#[derive(Clone, Debug, Default)]
pub struct DurationSum {
    cycles: u128,
    seconds: f64,
    count: u64,
}

impl DurationSum {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, d: Duration) {
        self.cycles += u128::from(d.cycles);
        self.seconds += d.seconds;
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of everything pushed so far; zero when empty.
    pub fn mean(&self) -> MeanDuration {
        if self.count == 0 {
            return MeanDuration::default();
        }
        let n = self.count as f64;
        MeanDuration {
            cycles: self.cycles as f64 / n,
            seconds: self.seconds / n,
        }
    }
}

impl Extend<Duration> for DurationSum {
    fn extend<I: IntoIterator<Item = Duration>>(&mut self, iter: I) {
        for d in iter {
            self.push(d);
        }
    }
}

impl FromIterator<Duration> for DurationSum {
    fn from_iter<I: IntoIterator<Item = Duration>>(iter: I) -> Self {
        let mut sum = DurationSum::new();
        sum.extend(iter);
        sum
    }
}
