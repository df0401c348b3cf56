//! Terminal output and reporting

use colored::*;
use mkcomp_core::MkcompError;
use mkcomp_core::generator::BatchSummary;
use std::path::Path;

pub fn print_created(path: &Path) {
    println!("{} {}", "Created:".green(), path.display());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✔".green().bold(), message);
}

/// Print an error to stderr, with a caret under the failing position for
/// abbreviation errors
pub fn print_error(err: &MkcompError) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let MkcompError::Abbreviation { source, input } = err {
        eprintln!("{}", source.annotate(input).yellow());
    }
}

pub fn print_batch_summary(summary: &BatchSummary) {
    println!("\n{}", "Summary:".bold());
    println!("  Generated: {}", summary.generated.len().to_string().green());
    println!("  Files written: {}", summary.files_written.len());

    if summary.has_failures() {
        println!("  Failed: {}", summary.failures.len().to_string().red());
        for failure in &summary.failures {
            println!("    {} {}: {}", "✘".red(), failure.component.bold(), failure.error);
        }
    }
}
