//! stache core library — data model, data file loading, encodings, errors.
//!
//! Public API surface:
//! - [`data`] — [`DataNode`] tree and case-insensitive name binding
//! - [`loader`] — JSON data file parsing
//! - [`encoding`] — [`EncodingSpec`], BOM sniffing, encode / decode
//! - [`fs`] — the [`FileSystem`] capability used by the orchestrator
//! - [`types`] — [`TemplateUnit`] and [`RenderResult`]
//! - [`error`] — [`UserError`]

pub mod data;
pub mod encoding;
pub mod error;
pub mod fs;
pub mod loader;
pub mod types;

pub use data::{Binding, DataMap, DataNode, Scalar};
pub use encoding::{ByteOrder, EncodingSpec};
pub use error::UserError;
pub use fs::{FileSystem, MemoryFileSystem, RealFileSystem};
pub use loader::{encoding_hint, load_data, read_encoding_hint, EncodingHint};
pub use types::{RenderResult, TemplateUnit};
