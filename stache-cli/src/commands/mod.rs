//! Subcommand implementations and shared output helpers.

pub mod check;
pub mod diff;
pub mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use stache_sync::{expand_inputs, LogEntry, Severity};

/// Turn command-line paths into the list of templates to process.
pub(crate) fn collect_templates(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let templates = expand_inputs(paths).context("could not collect templates")?;
    log::debug!("{} template(s) to process", templates.len());
    Ok(templates)
}

/// Print batch entries: messages to stdout, warnings and errors to stderr.
pub(crate) fn print_entries<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) {
    for entry in entries {
        match entry.severity {
            Severity::Message => println!("{}", entry.message),
            Severity::Warning => eprintln!("{} {}", "warning:".yellow().bold(), entry.message),
            Severity::Error => eprintln!("{} {}", "error:".red().bold(), entry.message),
        }
    }
}
