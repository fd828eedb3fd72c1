//! Error types for stache-sync.

use std::error::Error as _;
use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

use stache_core::UserError;
use stache_renderer::RenderError;

/// All errors that can stop a single template unit.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Data file or encoding problem.
    #[error(transparent)]
    User(#[from] UserError),

    /// Data or template problem found while rendering.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The template path has no extension to strip, so the output would
    /// overwrite the template itself.
    #[error("The template file '{path}' has no extension; cannot derive an output file name.")]
    NoOutputName { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// `true` for expected domain errors whose message alone is enough.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, SyncError::Io { .. })
    }

    /// Text to report: the bare message for user-facing errors, the message
    /// plus every underlying cause for unexpected faults.
    pub fn diagnostic(&self) -> String {
        let mut text = self.to_string();
        if self.is_user_facing() {
            return text;
        }
        let mut cause = self.source();
        while let Some(err) = cause {
            let _ = write!(text, "\n  caused by: {err}");
            cause = err.source();
        }
        text
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
