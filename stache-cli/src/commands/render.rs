//! `stache render <PATHS>...` — render templates and write changed outputs.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use stache_core::RealFileSystem;
use stache_sync::{render_templates, WriteMode};

use super::{collect_templates, print_entries};

/// Arguments for `stache render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template files, or directories to search for `*.mustache` files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Show what would be written without actually writing any files.
    #[arg(long, conflicts_with = "force")]
    pub dry_run: bool,

    /// Rewrite outputs even when their content is unchanged.
    #[arg(long)]
    pub force: bool,
}

impl RenderArgs {
    fn mode(&self) -> WriteMode {
        if self.dry_run {
            WriteMode::DryRun
        } else if self.force {
            WriteMode::Always
        } else {
            WriteMode::IfChanged
        }
    }

    pub fn run(self) -> Result<()> {
        let templates = collect_templates(&self.paths)?;
        if templates.is_empty() {
            println!("No templates found.");
            return Ok(());
        }

        let outcome = render_templates(&RealFileSystem, &templates, self.mode());
        print_entries(&outcome.entries);

        if !outcome.success {
            bail!("rendering failed; see errors above");
        }
        Ok(())
    }
}
