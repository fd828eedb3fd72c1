//! Companion path derivation for a template file.
//!
//! | file     | example                  |
//! |----------|--------------------------|
//! | template | `src/Foo.cs.mustache`    |
//! | output   | `src/Foo.cs`             |
//! | data     | `src/Foo.cs.json`        |

use std::path::{Path, PathBuf};

use crate::error::SyncError;

/// The three files making up one template unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    pub template: PathBuf,
    pub output: PathBuf,
    pub data: PathBuf,
}

impl TemplatePaths {
    /// Derive output and data paths by stripping the template's final
    /// extension (only the last one: `Foo.cs.mustache` → `Foo.cs`).
    pub fn for_template(template: impl Into<PathBuf>) -> Result<Self, SyncError> {
        let template = template.into();
        if template.extension().is_none() {
            return Err(SyncError::NoOutputName { path: template });
        }
        let output = template.with_extension("");
        let mut data = output.clone().into_os_string();
        data.push(".json");
        Ok(TemplatePaths {
            template,
            output,
            data: PathBuf::from(data),
        })
    }
}

/// File name without directory, for messages and the `TemplateFile` variable.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
