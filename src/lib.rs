//! # ipc-bench
//!
//! Measures what primitive arithmetic instructions cost in CPU cycles, on
//! 16/32/64-bit integers and 32/64-bit floats, both as throughput (independent
//! operations overlapping in the pipeline) and as latency (a serial dependency
//! chain).
//!
//! ```no_run
//! use ipc_bench::prelude::*;
//!
//! let mut ctx = BenchContext::new(DurationMeasurer::new(), EngineConfig::default());
//! ctx.calibrate();
//! let cost = ctx.run::<u32, Add>(ExecutionMode::Pipelined, 256)?;
//! println!("{:.3} cycles per add", cost.cycles_per_op);
//! # Ok::<(), ipc_bench::error::BenchError>(())
//! ```

pub mod buffer;
pub mod data;
pub mod engine;
pub mod error;
pub mod measure;
pub mod registry;
pub mod runner;
pub mod utils;

/// Re-export tui from utils for the binary
pub use utils::tui;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::buffer::AlignedBuffer;
    pub use crate::data::FillPattern;
    pub use crate::engine::{
        pipelined_measure, sequential_measure, Add, ArithOp, BenchContext, Div, EngineConfig,
        ExecutionMode, Mul, OpCost, Operation, Passthrough, Sub, Word, WordType,
    };
    pub use crate::error::{BenchError, Result};
    pub use crate::measure::{Duration, DurationMeasurer};
    pub use crate::registry::{build_registry, BenchmarkCase, CaseRegistry};
    pub use crate::runner::{run_plan, CaseResult, RunPlan};
}
