//! Error types for stache-core.

use thiserror::Error;

/// Expected domain errors whose message alone is shown to the user.
///
/// Anything that is *not* a `UserError` is treated as an unexpected fault by
/// the orchestrator and reported with its full cause chain.
#[derive(Debug, Error)]
pub enum UserError {
    /// The data file contains nothing but whitespace.
    #[error("The data file '{file}' is empty.")]
    EmptyDataFile { file: String },

    /// The data file is not valid JSON (or does not fit the expected record shape).
    #[error("The content of data file '{file}' is invalid: {source}")]
    InvalidDataFile {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The data file parsed, but its top-level value is not an object.
    #[error("The content of data file '{file}' is not an object but {kind}.")]
    NotAnObject { file: String, kind: &'static str },

    /// `$Encoding` names an encoding we cannot resolve.
    #[error("'{name}' is not a supported encoding name.")]
    UnsupportedEncoding { name: String },
}
