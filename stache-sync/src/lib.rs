//! # stache-sync
//!
//! Keeps generated files in sync with their Mustache templates.
//!
//! Call [`render_templates`] with a list of `*.mustache` paths. Each template
//! is rendered with its companion `.json` data file and the output is written
//! only when its content actually changed, so downstream incremental builds
//! are not invalidated.

pub mod diff;
pub mod discover;
pub mod encoding;
pub mod error;
pub mod log;
pub mod paths;
pub mod pipeline;
pub mod writer;

pub use diff::{diff_templates, DiffReport, FileDiff};
pub use discover::{discover_templates, expand_inputs};
pub use error::SyncError;
pub use log::{LogEntry, Severity};
pub use paths::TemplatePaths;
pub use pipeline::{load_unit, render_templates, BatchOutcome, UnitOutcome};
pub use writer::{write_if_changed, WriteMode, WriteResult};
