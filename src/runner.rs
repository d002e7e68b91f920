//! Sequencing of benchmark cases over buffer sizes and execution modes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::engine::{BenchContext, ExecutionMode, OpCost, Operation, WordType};
use crate::registry::BenchmarkCase;

/// What to run for every selected case.
#[derive(Clone, Debug)]
pub struct RunPlan {
    /// Buffer sizes in bytes, run in this order.
    pub sizes: Vec<usize>,
    pub modes: Vec<ExecutionMode>,
    /// Shuffle the (case, mode) order within each size to avoid ordering bias.
    pub shuffle_seed: Option<u64>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            modes: ExecutionMode::ALL.to_vec(),
            shuffle_seed: None,
        }
    }
}

/// Powers of two from 64 bytes to 64 KiB.
pub fn default_sizes() -> Vec<usize> {
    (6..=16).map(|shift| 1usize << shift).collect()
}

/// One successful measurement.
#[derive(Clone, Debug)]
pub struct CaseResult {
    pub operation: Operation,
    pub word: WordType,
    pub mode: ExecutionMode,
    pub buffer_size: usize,
    pub cost: OpCost,
}

impl CaseResult {
    pub fn name(&self) -> String {
        format!("{} {}", self.operation, self.word)
    }
}

/// A (case, mode, size) combination that was rejected or could not be allocated.
#[derive(Clone, Debug)]
pub struct Skipped {
    pub case: String,
    pub mode: ExecutionMode,
    pub buffer_size: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    /// Sorted by operation, word type, buffer size, then mode.
    pub results: Vec<CaseResult>,
    pub skipped: Vec<Skipped>,
}

/// Run every case in every mode at every size of the plan.
///
/// A failing combination is recorded in [`RunSummary::skipped`] and the run
/// moves on; no partial result is ever reported for it.
pub fn run_plan(
    ctx: &mut BenchContext,
    cases: &[&dyn BenchmarkCase],
    plan: &RunPlan,
) -> RunSummary {
    let mut rng = plan.shuffle_seed.map(StdRng::seed_from_u64);
    let mut summary = RunSummary::default();

    for &size in &plan.sizes {
        let mut tasks: Vec<(usize, ExecutionMode)> = (0..cases.len())
            .flat_map(|c| plan.modes.iter().map(move |&m| (c, m)))
            .collect();
        if let Some(rng) = rng.as_mut() {
            tasks.shuffle(rng);
        }

        for (case_idx, mode) in tasks {
            let case = cases[case_idx];
            match case.run(ctx, mode, size) {
                Ok(cost) => {
                    debug!(
                        case = %case.name(),
                        %mode,
                        size,
                        cycles_per_op = cost.cycles_per_op,
                        mhz = cost.frequency_mhz.unwrap_or(0.0),
                        "measured"
                    );
                    summary.results.push(CaseResult {
                        operation: case.operation(),
                        word: case.word_type(),
                        mode,
                        buffer_size: size,
                        cost,
                    });
                }
                Err(e) => {
                    warn!(case = %case.name(), %mode, size, error = %e, "skipping benchmark");
                    summary.skipped.push(Skipped {
                        case: case.name(),
                        mode,
                        buffer_size: size,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    summary
        .results
        .sort_by_key(|r| (r.operation, r.word, r.buffer_size, r.mode));

    info!(
        measured = summary.results.len(),
        skipped = summary.skipped.len(),
        "run complete"
    );
    summary
}
