//! Template discovery for command-line inputs.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// File extension marking a template.
pub const TEMPLATE_EXTENSION: &str = "mustache";

/// Recursively collect `*.mustache` files under `dir`, sorted by path.
pub fn discover_templates(dir: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let mut found = Vec::new();
    collect(dir, &mut found)?;
    found.sort();
    tracing::debug!("found {} template(s) under {}", found.len(), dir.display());
    Ok(found)
}

fn collect(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SyncError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            collect(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
            out.push(path);
        }
    }
    Ok(())
}

/// Expand command-line inputs: directories are searched with
/// [`discover_templates`], anything else is taken as a template path as-is
/// (a missing file is reported later by the pipeline).
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, SyncError> {
    let mut templates = Vec::new();
    for input in inputs {
        if input.is_dir() {
            templates.extend(discover_templates(input)?);
        } else {
            templates.push(input.clone());
        }
    }
    Ok(templates)
}
