//! `stache check <PATHS>...` — fail when any output is out of date.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use stache_core::RealFileSystem;
use stache_sync::{render_templates, Severity, WriteMode};

use super::{collect_templates, print_entries};

/// Arguments for `stache check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Template files, or directories to search for `*.mustache` files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let templates = collect_templates(&self.paths)?;
        let outcome = render_templates(&RealFileSystem, &templates, WriteMode::DryRun);
        print_entries(
            outcome
                .entries
                .iter()
                .filter(|e| e.severity != Severity::Message),
        );

        let stale: Vec<_> = outcome.changed_outputs().collect();
        for path in &stale {
            println!("{} {}", "out of date:".yellow().bold(), path.display());
        }

        if !outcome.success {
            bail!("check failed; see errors above");
        }
        if !stale.is_empty() {
            bail!("{} output file(s) out of date; run `stache render`", stale.len());
        }
        println!("{} {} template(s) up to date", "✓".green().bold(), outcome.units.len());
        Ok(())
    }
}
