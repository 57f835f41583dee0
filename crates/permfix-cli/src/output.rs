//! Human and JSON report rendering

use colored::Colorize;

use permfix_core::{Outcome, RunReport};

/// Print the run report to stdout.
///
/// One line per entry that needed attention, then the skipped packages,
/// then the summary. `--json` replaces all of it with the serialized
/// report.
pub fn print_report(report: &RunReport, json: bool, dry_run: bool) -> serde_json::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for entry in &report.entries {
        let path = entry.path.display();
        match &entry.outcome {
            Outcome::Corrected { changes } => {
                let label = if dry_run { "would fix" } else { "fixed" };
                let changes = changes
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{} {path}: {changes}", label.green().bold());
            }
            Outcome::Missing => {
                println!("{} {path}", "missing".yellow().bold());
            }
            Outcome::Skipped { reason } => {
                println!("{} {path}: {reason}", "skipped".dimmed());
            }
            Outcome::Error { message } => {
                println!("{} {path}: {message}", "error".red().bold());
            }
            Outcome::Unchanged => {}
        }
    }

    for pkg in &report.summary.packages_skipped {
        println!(
            "{} {}: {}",
            "skipped package".red().bold(),
            pkg.package,
            pkg.reason
        );
    }

    println!("==> {}", report.summary);
    Ok(())
}
