//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use std::collections::BTreeMap;

use terminal_size::{terminal_size, Width};

use crate::engine::{ExecutionMode, Operation, WordType};
use crate::registry::CaseRegistry;
use crate::runner::{CaseResult, Skipped};
use crate::utils::cycles::unit_name;

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// Print the application header
pub fn print_header(cpu_model: &str) {
    let term_width = get_term_width().min(80);
    let title = " Instruction Cost Benchmarks ";
    let padding = term_width.saturating_sub(title.len()) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    println!("╔{}╗", "═".repeat(term_width));
    println!("║{}{}{}║", " ".repeat(padding), title, " ".repeat(right_padding));
    println!("╚{}╝", "═".repeat(term_width));
    println!("  CPU: {}", truncate(cpu_model, term_width.saturating_sub(7)));
    println!();
}

/// Print every registered (operation, word type) case
pub fn print_case_list(registry: &CaseRegistry) {
    println!("Available cases:");
    println!();
    for case in registry.all() {
        let kind = if case.word_type().is_float() { "float" } else { "integer" };
        println!("  {:<12} [{}]", case.name(), kind);
    }
}

/// Print one table per case: buffer sizes down, execution modes across.
pub fn print_results(results: &[CaseResult]) {
    let mut grouped: BTreeMap<(Operation, WordType), BTreeMap<usize, Vec<&CaseResult>>> =
        BTreeMap::new();
    for r in results {
        grouped
            .entry((r.operation, r.word))
            .or_default()
            .entry(r.buffer_size)
            .or_default()
            .push(r);
    }

    let unit = unit_name();
    let table_width = get_term_width().saturating_sub(4).min(76);

    for ((operation, word), by_size) in grouped {
        println!("  {} {}", operation, word);
        println!("  {}", "─".repeat(table_width));
        println!(
            "  {:>12} {:>18} {:>18} {:>14}",
            "Size [B]",
            format!("Pipelined [{}]", unit),
            format!("Sequential [{}]", unit),
            "Freq [MHz]"
        );
        println!("  {}", "─".repeat(table_width));

        for (size, rows) in by_size {
            let cell = |mode: ExecutionMode| {
                rows.iter()
                    .find(|r| r.mode == mode)
                    .map(|r| format!("{:.3}", r.cost.cycles_per_op))
                    .unwrap_or_else(|| "-".to_string())
            };
            // Both modes run on the same core; report the first inferred frequency.
            let mhz = rows
                .iter()
                .find_map(|r| r.cost.frequency_mhz)
                .map(|f| format!("{:.1}", f))
                .unwrap_or_else(|| "-".to_string());

            println!(
                "  {:>12} {:>18} {:>18} {:>14}",
                size,
                cell(ExecutionMode::Pipelined),
                cell(ExecutionMode::Sequential),
                mhz
            );
        }
        println!();
    }
}

/// List combinations that were rejected instead of measured
pub fn print_skipped(skipped: &[Skipped]) {
    if skipped.is_empty() {
        return;
    }
    let width = get_term_width().saturating_sub(4);
    println!("  Skipped {} combination(s):", skipped.len());
    for s in skipped {
        let line = format!("{} {} @ {} B: {}", s.case, s.mode, s.buffer_size, s.reason);
        println!("    {}", truncate(&line, width));
    }
    println!();
}
