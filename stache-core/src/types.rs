//! Per-unit records passed between the loader, the engine and the orchestrator.
//!
//! All path fields use `PathBuf`; file *names* (no directory) are `String`s
//! because they only ever appear in messages and in the `TemplateFile`
//! variable.

use std::path::PathBuf;

use crate::encoding::EncodingSpec;

/// Everything needed to render one template, loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateUnit {
    /// Decoded template source.
    pub template_text: String,
    /// Template file name without directory, e.g. `Foo.cs.mustache`.
    pub template_file_name: String,
    /// Raw contents of the data file.
    pub data_json: String,
    /// Data file name without directory, e.g. `Foo.cs.json`.
    pub data_file_name: String,
    /// Encoding of the template file, reused for the output file.
    pub encoding: EncodingSpec,
}

/// Outcome of rendering one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub output_path: PathBuf,
    /// `false` when the output already held the rendered text (or in dry-run mode).
    pub was_written: bool,
    pub rendered_text: String,
}
