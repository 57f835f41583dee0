//! permfix CLI
//!
//! Repairs owner/group/mode drift between the pacman local database and
//! the live filesystem.

mod cli;
mod error;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use permfix_core::{RunOptions, Scope};
use permfix_db::LocalDatabase;
use permfix_fs::RealFileOps;

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let scope = match cli.scope() {
        Scope::Paths(paths) => Scope::Paths(
            paths
                .iter()
                .map(std::path::absolute)
                .collect::<std::io::Result<_>>()?,
        ),
        scope => scope,
    };

    if !cli.dry_run && !nix::unistd::Uid::effective().is_root() {
        eprintln!(
            "{}: not running as root; corrections outside your own files will fail",
            "warning".yellow().bold()
        );
    }

    let ops = RealFileOps;
    let opts = RunOptions {
        dry_run: cli.dry_run,
    };

    let report = if scope.needs_database() {
        let db = LocalDatabase::open(&cli.root, cli.dbpath.clone())?;
        permfix_core::run(&scope, Some(&db), &ops, &opts)?
    } else {
        permfix_core::run(&scope, None, &ops, &opts)?
    };

    output::print_report(&report, cli.json, cli.dry_run)?;

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "completed with {} errors and {} skipped packages",
            report.summary.errors,
            report.summary.packages_skipped.len()
        )))
    }
}
