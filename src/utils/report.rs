//! CSV export of benchmark results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::runner::CaseResult;

pub const CSV_HEADER: &str =
    "CPU model, Operation, Execution, Buffer size [byte], Cycle count, Frequency [MHz]";

/// Write one row per result after the header.
pub fn write_csv<W: Write>(
    mut out: W,
    cpu_model: &str,
    results: &[CaseResult],
) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;

    let model = quote(cpu_model);
    for r in results {
        let frequency = r
            .cost
            .frequency_mhz
            .map(|mhz| format!("{:.1}", mhz))
            .unwrap_or_default();
        writeln!(
            out,
            "{}, {}, {}, {}, {:.4}, {}",
            model,
            quote(&r.name()),
            r.mode,
            r.buffer_size,
            r.cost.cycles_per_op,
            frequency
        )?;
    }

    out.flush()
}

/// Export results to a CSV file at `path`, replacing it.
pub fn export_csv(path: impl AsRef<Path>, cpu_model: &str, results: &[CaseResult]) -> Result<()> {
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), cpu_model, results)?;
    Ok(())
}

/// Quote a field if it would otherwise break the row.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
