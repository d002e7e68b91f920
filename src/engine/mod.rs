//! # Micro-benchmark engine
//!
//! Converts a measured duration into the cost of one arithmetic operation in
//! two regimes:
//!
//! - **Pipelined** (throughput): independent packs `[a, b, result, padding]`
//!   let a superscalar core overlap many operations.
//! - **Sequential** (latency): a dependency chain `acc = op(acc, next)` forces
//!   every operation to wait for the previous one.
//!
//! Both algorithms share the same protocol: validate the buffers, then for each
//! sample copy the source into the working buffer, run one discarded warm-up
//! pass and one recorded pass, and finally divide the mean duration by the
//! number of operations in a pass. Every working-buffer access in the timed
//! loop is volatile so the optimizer cannot drop it.

mod context;
mod layout;
mod ops;
mod pipelined;
mod sequential;
#[cfg(test)]
mod test;
mod word;

pub use context::BenchContext;
pub use layout::{repeat_count, ExecutionMode, PackLayout, PIPELINED, SEQUENTIAL};
pub use ops::{Add, ArithOp, Div, Mul, Operation, Passthrough, Sub};
pub use pipelined::pipelined_measure;
pub use sequential::sequential_measure;
pub use word::{Word, WordType};

use crate::error::{BenchError, Result};
use crate::measure::MeanDuration;

/// Sampling parameters shared by both algorithms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Warm-up/record pairs averaged per result.
    pub samples: usize,
    /// Target operation count of one timed pass; sets the repeat count.
    pub ops_budget: usize,
}

impl EngineConfig {
    pub const DEFAULT_SAMPLES: usize = 1 << 15;
    pub const DEFAULT_OPS_BUDGET: usize = 1 << 14;

    /// Reject parameters that would average over nothing.
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(BenchError::InvalidConfig {
                reason: "at least one sample is required",
            });
        }
        Ok(())
    }

    /// Set the number of warm-up/record pairs
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set the target operation count of one pass
    pub fn with_ops_budget(mut self, ops_budget: usize) -> Self {
        self.ops_budget = ops_budget;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            samples: Self::DEFAULT_SAMPLES,
            ops_budget: Self::DEFAULT_OPS_BUDGET,
        }
    }
}

/// Cost of one operation, averaged over all recorded samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpCost {
    pub cycles_per_op: f64,
    /// Frequency inferred from the averaged cycle and wall-clock durations.
    pub frequency_mhz: Option<f64>,
    pub ops_per_repeat: usize,
    pub repeats: usize,
    pub samples: usize,
    /// Mean net duration of one recorded pass.
    pub mean: MeanDuration,
}

impl OpCost {
    pub(crate) fn new(
        mean: MeanDuration,
        ops_per_repeat: usize,
        repeats: usize,
        samples: usize,
    ) -> Self {
        let ops = (ops_per_repeat * repeats) as f64;
        Self {
            cycles_per_op: mean.cycles / ops,
            frequency_mhz: mean.inferred_frequency_mhz(),
            ops_per_repeat,
            repeats,
            samples,
            mean,
        }
    }

    pub fn ops_per_pass(&self) -> usize {
        self.ops_per_repeat * self.repeats
    }
}
