//! Conditional output writer.
//!
//! An output file is rewritten only when its decoded text differs from the
//! freshly rendered text. Leaving an unchanged file alone keeps its
//! modification time, which is what downstream incremental builds look at.

use std::path::{Path, PathBuf};

use stache_core::{EncodingSpec, FileSystem};

use crate::error::{io_err, SyncError};

/// How [`write_if_changed`] treats the target file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Write only when the content differs.
    #[default]
    IfChanged,
    /// Always write, even if the content is identical.
    Always,
    /// Never write; report what would happen.
    DryRun,
}

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed, did not exist, or forced).
    Written { path: PathBuf },
    /// File already held the rendered text and was left untouched.
    Unchanged { path: PathBuf },
    /// Dry-run mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

/// Write `content` to `path` in `encoding` unless the file already holds it.
///
/// See `holds_content` for what "already holds" means.
pub fn write_if_changed<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    content: &str,
    encoding: EncodingSpec,
    mode: WriteMode,
) -> Result<WriteResult, SyncError> {
    if mode != WriteMode::Always && fs.exists(path) {
        let existing = fs.read_bytes(path).map_err(|e| io_err(path, e))?;
        if holds_content(&existing, content, encoding) {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if mode == WriteMode::DryRun {
        tracing::debug!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    fs.write_text(path, content, encoding)
        .map_err(|e| io_err(path, e))?;
    tracing::debug!("wrote: {} ({encoding})", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// `true` when `existing` already represents `content` in `encoding`.
///
/// The encoded bytes are compared first, ignoring any BOM, so text a legacy
/// encoding stores as character references still matches. Otherwise the file
/// is decoded (its own BOM wins) and compared as text.
fn holds_content(existing: &[u8], content: &str, encoding: EncodingSpec) -> bool {
    EncodingSpec::strip_bom(existing) == encoding.encode_body(content).as_slice()
        || encoding.decode(existing) == content
}
