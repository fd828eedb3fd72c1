//! JSON data file parsing.
//!
//! - [`load_data`] returns the full [`DataNode`] tree and insists on an
//!   object root.
//! - [`encoding_hint`] pulls the optional `$Encoding` field out of a loaded
//!   tree. The key is matched like any template name: exact spelling first,
//!   then case-insensitively.
//! - [`read_encoding_hint`] does both for callers holding raw JSON.

use serde::de::{DeserializeOwned, Error as _};

use crate::data::{DataNode, Scalar};
use crate::error::UserError;

/// The reserved data-file key naming the template file's encoding.
pub const ENCODING_KEY: &str = "$Encoding";

/// Fixed-shape view of a data file used by the encoding resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingHint {
    pub encoding: Option<String>,
}

impl EncodingHint {
    /// The requested encoding name, ignoring blank values.
    pub fn name(&self) -> Option<&str> {
        self.encoding
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Parse a data file into a tree whose root is guaranteed to be an object.
///
/// `file` is the display name used in error messages.
pub fn load_data(json: &str, file: &str) -> Result<DataNode, UserError> {
    let value: serde_json::Value = deserialize(json, file)?;
    match DataNode::from(value) {
        root @ DataNode::Object(_) => Ok(root),
        other => Err(UserError::NotAnObject {
            file: file.to_owned(),
            kind: other.kind_description(),
        }),
    }
}

/// Extract `$Encoding` from a loaded data tree. `null` counts as absent;
/// any other non-string value makes the data file invalid.
pub fn encoding_hint(root: &DataNode, file: &str) -> Result<EncodingHint, UserError> {
    let encoding = match root.get(ENCODING_KEY) {
        None | Some(DataNode::Scalar(Scalar::Null)) => None,
        Some(DataNode::Scalar(Scalar::String(name))) => Some(name.clone()),
        Some(other) => {
            return Err(UserError::InvalidDataFile {
                file: file.to_owned(),
                source: serde_json::Error::custom(format!(
                    "`{ENCODING_KEY}` must be a string, found {}",
                    other.kind_description()
                )),
            })
        }
    };
    Ok(EncodingHint { encoding })
}

/// Parse a data file and read only its `$Encoding` field.
pub fn read_encoding_hint(json: &str, file: &str) -> Result<EncodingHint, UserError> {
    encoding_hint(&load_data(json, file)?, file)
}

fn deserialize<T: DeserializeOwned>(json: &str, file: &str) -> Result<T, UserError> {
    let json = json.strip_prefix('\u{feff}').unwrap_or(json);
    if json.trim().is_empty() {
        return Err(UserError::EmptyDataFile {
            file: file.to_owned(),
        });
    }
    serde_json::from_str(json).map_err(|source| UserError::InvalidDataFile {
        file: file.to_owned(),
        source,
    })
}
