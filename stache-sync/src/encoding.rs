//! Encoding resolution for a template unit.
//!
//! The data file may name an encoding with `$Encoding`; otherwise UTF-8
//! without BOM is assumed. A BOM at the start of the template overrides
//! either choice. The result is used to decode the template and to encode
//! (and compare against) its output file.

use stache_core::{EncodingHint, EncodingSpec};

use crate::error::SyncError;

/// Pick the encoding for one unit from its data-file hint and template bytes.
pub fn resolve_encoding(
    hint: &EncodingHint,
    data_file_name: &str,
    template_bytes: &[u8],
) -> Result<EncodingSpec, SyncError> {
    let declared = match hint.name() {
        Some(name) => EncodingSpec::for_label(name)?,
        None => EncodingSpec::UTF8_NO_BOM,
    };
    let resolved = declared.detect(template_bytes);
    tracing::debug!(
        "encoding for {data_file_name}: declared {declared}, resolved {resolved}"
    );
    Ok(resolved)
}
