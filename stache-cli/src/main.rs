//! stache — render Mustache templates into source files before a build.
//!
//! # Usage
//!
//! ```text
//! stache render <PATHS>... [--dry-run] [--force] [-v]
//! stache check <PATHS>...
//! stache diff <PATHS>...
//! ```
//!
//! Each path is either a `*.mustache` template or a directory searched
//! recursively for templates.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, diff::DiffArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "stache",
    version,
    about = "Render Mustache templates with JSON data, rewriting outputs only when they change",
    long_about = None,
)]
struct Cli {
    /// Log per-step detail (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render templates and write outputs that changed.
    Render(RenderArgs),

    /// Report outputs that are out of date without writing them.
    Check(CheckArgs),

    /// Show unified diff of what render would write.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}
