//! CLI for measuring arithmetic instruction costs.
//!
//! Usage:
//!   ipc-bench                              # Every case, every mode, 64 B..64 KiB
//!   ipc-bench --list                       # List available cases
//!   ipc-bench --ops add,div --words u64    # Subset of cases
//!   ipc-bench --sizes 256,4096 --csv out.csv

use std::path::PathBuf;

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use ipc_bench::data::FillPattern;
use ipc_bench::engine::{BenchContext, EngineConfig, ExecutionMode, Operation, WordType};
use ipc_bench::measure::DurationMeasurer;
use ipc_bench::registry::build_registry;
use ipc_bench::runner::{default_sizes, run_plan, RunPlan};
use ipc_bench::tui;
use ipc_bench::utils::cpu_affinity::current_cpu;
use ipc_bench::utils::{cpu_model, elevate_priority, export_csv, sample_frequency_mhz, CpuPinGuard};

/// Cycle cost of add/sub/mul/div, as throughput and as latency
#[derive(Parser, Debug)]
#[command(name = "ipc-bench", version, about)]
struct Cli {
    /// Buffer sizes in bytes, comma separated (default: powers of two 64..=65536)
    #[arg(long, value_delimiter = ',')]
    sizes: Vec<usize>,

    /// Operations to run (default: all)
    #[arg(long = "ops", value_enum, value_delimiter = ',')]
    operations: Vec<Operation>,

    /// Word types to run (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    words: Vec<WordType>,

    /// Execution modes to run (default: both)
    #[arg(long, value_enum, value_delimiter = ',')]
    modes: Vec<ExecutionMode>,

    /// Warm-up/record sample pairs averaged per result
    #[arg(
        long,
        default_value_t = EngineConfig::DEFAULT_SAMPLES,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    samples: usize,

    /// Operations per timed pass
    #[arg(long, default_value_t = EngineConfig::DEFAULT_OPS_BUDGET)]
    ops_budget: usize,

    /// Empty measurements averaged to calibrate timer overhead
    #[arg(long, default_value_t = DurationMeasurer::DEFAULT_CALIBRATION_SAMPLES)]
    calibration_samples: usize,

    /// Source data pattern
    #[arg(long, value_enum, default_value_t = FillPattern::Uniform)]
    fill: FillPattern,

    /// Shuffle case order within each size using this seed
    #[arg(long)]
    seed: Option<u64>,

    /// Shuffle case order with a random seed
    #[arg(long)]
    shuffle: bool,

    /// CSV report path
    #[arg(long, default_value = "ipc_bench.csv")]
    csv: PathBuf,

    /// Do not write the CSV report
    #[arg(long)]
    no_csv: bool,

    /// Do not try to raise scheduling priority
    #[arg(long)]
    no_priority: bool,

    /// Do not pin the thread to its current core
    #[arg(long)]
    no_pin: bool,

    /// List available cases and exit
    #[arg(short, long)]
    list: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ipc_bench=debug" } else { "ipc_bench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = build_registry();
    if cli.list {
        tui::print_case_list(&registry);
        return Ok(());
    }

    let cases = registry.select(&cli.operations, &cli.words);
    if cases.is_empty() {
        anyhow::bail!("no benchmark case matches the selected operations and word types");
    }

    let cpu_model = cpu_model();
    tui::print_header(&cpu_model);

    if !cli.no_priority {
        if let Err(e) = elevate_priority() {
            warn!(error = %e, "running at default priority, expect more variance");
        }
    }

    let pin = if cli.no_pin {
        None
    } else {
        match CpuPinGuard::pin_current() {
            Ok(guard) => {
                info!(core = guard.core(), "pinned to core");
                Some(guard)
            }
            Err(e) => {
                warn!(error = %e, "running unpinned");
                None
            }
        }
    };

    let config = EngineConfig::default()
        .with_samples(cli.samples)
        .with_ops_budget(cli.ops_budget);
    let measurer = DurationMeasurer::with_calibration_samples(cli.calibration_samples);
    let mut ctx = BenchContext::new(measurer, config).with_fill_pattern(cli.fill);
    ctx.calibrate();

    let plan = RunPlan {
        sizes: if cli.sizes.is_empty() { default_sizes() } else { cli.sizes.clone() },
        modes: if cli.modes.is_empty() { ExecutionMode::ALL.to_vec() } else { cli.modes.clone() },
        shuffle_seed: cli.seed.or_else(|| cli.shuffle.then(rand::random::<u64>)),
    };
    if let Some(seed) = plan.shuffle_seed {
        info!(seed, "shuffling case order");
    }

    let summary = run_plan(&mut ctx, &cases, &plan);

    // Informational only: compare with what the cpufreq driver reports.
    let core = pin.as_ref().map(|g| g.core()).or_else(current_cpu);
    if let Some(core) = core {
        match sample_frequency_mhz(core) {
            Ok(mhz) => info!(core, mhz, "cpufreq reported frequency"),
            Err(e) => debug!(error = %e, "no cpufreq frequency"),
        }
    }

    tui::print_results(&summary.results);
    tui::print_skipped(&summary.skipped);

    if !cli.no_csv {
        export_csv(&cli.csv, &cpu_model, &summary.results)
            .with_context(|| format!("writing {}", cli.csv.display()))?;
        println!("  Results exported to: {}", cli.csv.display());
    }

    Ok(())
}
