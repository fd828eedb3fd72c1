//! `stache diff <PATHS>...` — show unified diffs for what render would write.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use stache_core::RealFileSystem;
use stache_sync::{diff_templates, Severity};

use super::{collect_templates, print_entries};

/// Arguments for `stache diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Template files, or directories to search for `*.mustache` files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let templates = collect_templates(&self.paths)?;
        let report = diff_templates(&RealFileSystem, &templates);
        print_entries(
            report
                .outcome
                .entries
                .iter()
                .filter(|e| e.severity != Severity::Message),
        );

        if report.diffs.is_empty() {
            println!("No differences.");
        }
        for diff in &report.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        if !report.outcome.success {
            bail!("diff incomplete; see errors above");
        }
        Ok(())
    }
}
