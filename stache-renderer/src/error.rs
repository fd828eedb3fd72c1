//! Error types for stache-renderer.

use thiserror::Error;

use stache_core::UserError;

/// Template syntax errors. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("line {line}: tag is never closed (expected '{expected}')")]
    UnclosedTag { line: usize, expected: &'static str },

    #[error("line {line}: tag has no name")]
    EmptyTag { line: usize },

    #[error("line {line}: {feature} are not supported")]
    Unsupported { line: usize, feature: &'static str },

    #[error("line {line}: section '{name}' is never closed")]
    UnclosedSection { name: String, line: usize },

    #[error("line {line}: closing tag '{name}' has no matching section")]
    UnexpectedClose { name: String, line: usize },

    #[error("line {line}: closing tag '{found}' does not match open section '{expected}'")]
    MismatchedClose {
        expected: String,
        found: String,
        line: usize,
    },
}

/// Everything that can stop a unit from rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Data file problems (empty, malformed, wrong root kind).
    #[error(transparent)]
    Data(#[from] UserError),

    /// The template itself does not parse.
    #[error("The template '{file}' is invalid: {source}")]
    Template {
        file: String,
        #[source]
        source: TemplateError,
    },
}
