//! Batch render pipeline shared by every `stache` subcommand.
//!
//! Each template path is processed independently: a failing unit is logged
//! and marks the batch failed, but the remaining units still run.

use std::path::{Path, PathBuf};

use stache_core::{
    encoding_hint, load_data, DataNode, EncodingSpec, FileSystem, RenderResult, TemplateUnit,
};
use stache_renderer::render_with_data;

use crate::encoding::resolve_encoding;
use crate::error::{io_err, SyncError};
use crate::log::{LogEntry, Severity};
use crate::paths::{file_name, TemplatePaths};
use crate::writer::{write_if_changed, WriteMode, WriteResult};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// What happened to one template path.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    /// Rendered; `write` says whether the output was touched.
    Rendered {
        template: PathBuf,
        result: RenderResult,
        write: WriteResult,
        encoding: EncodingSpec,
    },
    /// Template or data file missing; not an error.
    Skipped { template: PathBuf },
    /// Rendering failed; the error has been logged.
    Failed { template: PathBuf },
}

/// Result of [`render_templates`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// `false` when at least one unit failed.
    pub success: bool,
    /// Human-readable log, in processing order.
    pub entries: Vec<LogEntry>,
    /// One outcome per input path, in input order.
    pub units: Vec<UnitOutcome>,
}

impl BatchOutcome {
    fn new() -> Self {
        BatchOutcome {
            success: true,
            ..Default::default()
        }
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        if entry.severity == Severity::Error {
            self.success = false;
        }
        self.entries.push(entry);
    }

    /// Entries of one severity.
    pub fn entries_of(&self, severity: Severity) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.severity == severity)
    }

    /// Outputs whose content differs from what is on disk: written ones, or
    /// ones that would be written in dry-run mode.
    pub fn changed_outputs(&self) -> impl Iterator<Item = &Path> {
        self.units.iter().filter_map(|unit| match unit {
            UnitOutcome::Rendered { write, .. } if !matches!(write, WriteResult::Unchanged { .. }) => {
                Some(write.path())
            }
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Render every template in `templates`, in order.
///
/// Never returns an error: per-unit failures are recorded in the outcome.
pub fn render_templates<F, P>(fs: &F, templates: &[P], mode: WriteMode) -> BatchOutcome
where
    F: FileSystem + ?Sized,
    P: AsRef<Path>,
{
    let mut outcome = BatchOutcome::new();
    if templates.is_empty() {
        return outcome;
    }
    outcome.push(LogEntry::message(format!(
        "stache v{}",
        env!("CARGO_PKG_VERSION")
    )));

    for template in templates {
        let template = template.as_ref();
        let unit = match render_one(fs, template, mode, &mut outcome) {
            Ok(unit) => unit,
            Err(err) => {
                tracing::debug!("{} failed: {err:?}", template.display());
                outcome.push(LogEntry::error(err.diagnostic()));
                UnitOutcome::Failed {
                    template: template.to_path_buf(),
                }
            }
        };
        outcome.units.push(unit);
    }
    outcome
}

/// Read the template and data file of one unit.
///
/// The data file is parsed once: the tree is validated as a whole (so a wrong
/// root kind is reported as such), its `$Encoding` hint is read from it, and
/// it is returned for rendering.
pub fn load_unit<F: FileSystem + ?Sized>(
    fs: &F,
    paths: &TemplatePaths,
) -> Result<(TemplateUnit, DataNode), SyncError> {
    let data_file_name = file_name(&paths.data);
    let data_json = fs
        .read_text(&paths.data, EncodingSpec::UTF8_NO_BOM)
        .map_err(|e| io_err(&paths.data, e))?;
    let data = load_data(&data_json, &data_file_name)?;
    let hint = encoding_hint(&data, &data_file_name)?;

    let template_bytes = fs
        .read_bytes(&paths.template)
        .map_err(|e| io_err(&paths.template, e))?;
    let encoding = resolve_encoding(&hint, &data_file_name, &template_bytes)?;

    let unit = TemplateUnit {
        template_text: encoding.decode(&template_bytes),
        template_file_name: file_name(&paths.template),
        data_json,
        data_file_name,
        encoding,
    };
    Ok((unit, data))
}

fn render_one<F: FileSystem + ?Sized>(
    fs: &F,
    template: &Path,
    mode: WriteMode,
    outcome: &mut BatchOutcome,
) -> Result<UnitOutcome, SyncError> {
    let paths = TemplatePaths::for_template(template)?;
    let skipped = || UnitOutcome::Skipped {
        template: template.to_path_buf(),
    };

    if !fs.exists(&paths.template) {
        outcome.push(LogEntry::warning(format!(
            "The template file '{}' doesn't exist. Ignoring it.",
            paths.template.display()
        )));
        return Ok(skipped());
    }
    if !fs.exists(&paths.data) {
        outcome.push(LogEntry::warning(format!(
            "The data file '{}' is missing for template file '{}'. Ignoring it.",
            file_name(&paths.data),
            paths.template.display()
        )));
        return Ok(skipped());
    }

    let (unit, data) = load_unit(fs, &paths)?;
    let rendered = render_with_data(&unit, data)?;
    let write = write_if_changed(fs, &paths.output, &rendered, unit.encoding, mode)?;

    let message = match &write {
        WriteResult::Written { path } => format!(
            "The file '{}' has been updated from template '{}'.",
            path.display(),
            paths.template.display()
        ),
        WriteResult::WouldWrite { path } => format!(
            "The file '{}' would be updated from template '{}'.",
            path.display(),
            paths.template.display()
        ),
        WriteResult::Unchanged { path } => format!(
            "The template target file '{}' is already up-to-date.",
            path.display()
        ),
    };
    outcome.push(LogEntry::message(message));

    Ok(UnitOutcome::Rendered {
        template: paths.template,
        result: RenderResult {
            output_path: paths.output,
            was_written: write.was_written(),
            rendered_text: rendered,
        },
        write,
        encoding: unit.encoding,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::SystemTime;

    use stache_core::MemoryFileSystem;

    use super::*;

    fn version_entry() -> LogEntry {
        LogEntry::message(format!("stache v{}", env!("CARGO_PKG_VERSION")))
    }

    #[test]
    fn empty_batch_succeeds_silently() {
        let fs = MemoryFileSystem::new();
        let outcome = render_templates::<_, PathBuf>(&fs, &[], WriteMode::IfChanged);
        assert!(outcome.success);
        assert!(outcome.entries.is_empty());
        assert!(outcome.units.is_empty());
    }

    #[test]
    fn renders_and_reports_update() {
        let fs = MemoryFileSystem::new()
            .with_file("/t/Foo.cs.mustache", "<b>{{MyTemplateValue}}</b> - <c>{{TemplateFile}}</c>")
            .with_file("/t/Foo.cs.json", r#"{ "MyTemplateValue": 123 }"#);

        let outcome = render_templates(&fs, &["/t/Foo.cs.mustache"], WriteMode::IfChanged);

        assert!(outcome.success);
        assert_eq!(
            fs.contents("/t/Foo.cs").unwrap(),
            b"<b>123</b> - <c>Foo.cs.mustache</c>"
        );
        assert_eq!(
            outcome.entries,
            vec![
                version_entry(),
                LogEntry::message(
                    "The file '/t/Foo.cs' has been updated from template '/t/Foo.cs.mustache'."
                ),
            ]
        );
    }

    #[test]
    fn second_run_reports_up_to_date() {
        let fs = MemoryFileSystem::new()
            .with_file("/t/Foo.cs.mustache", "{{a}}")
            .with_file("/t/Foo.cs.json", r#"{ "a": 1 }"#);
        render_templates(&fs, &["/t/Foo.cs.mustache"], WriteMode::IfChanged);
        let stamp = fs.modified(Path::new("/t/Foo.cs")).unwrap();

        let outcome = render_templates(&fs, &["/t/Foo.cs.mustache"], WriteMode::IfChanged);

        assert_eq!(fs.modified(Path::new("/t/Foo.cs")).unwrap(), stamp);
        assert_eq!(
            outcome.entries[1],
            LogEntry::message("The template target file '/t/Foo.cs' is already up-to-date.")
        );
        assert_eq!(outcome.changed_outputs().count(), 0);
    }

    #[test]
    fn missing_files_are_warnings_not_failures() {
        let fs = MemoryFileSystem::new().with_file("/t/NoData.txt.mustache", "x");
        let outcome = render_templates(
            &fs,
            &["/t/Gone.txt.mustache", "/t/NoData.txt.mustache"],
            WriteMode::IfChanged,
        );

        assert!(outcome.success);
        let warnings: Vec<_> = outcome
            .entries_of(Severity::Warning)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(
            warnings,
            [
                "The template file '/t/Gone.txt.mustache' doesn't exist. Ignoring it.",
                "The data file 'NoData.txt.json' is missing for template file '/t/NoData.txt.mustache'. Ignoring it.",
            ]
        );
        assert!(outcome
            .units
            .iter()
            .all(|u| matches!(u, UnitOutcome::Skipped { .. })));
        assert!(fs.contents("/t/NoData.txt").is_none());
    }

    #[test]
    fn user_errors_log_message_only() {
        let fs = MemoryFileSystem::new()
            .with_file("/t/Foo.cs.mustache", "{{a}}")
            .with_file("/t/Foo.cs.json", "[1, 2]");
        let outcome = render_templates(&fs, &["/t/Foo.cs.mustache"], WriteMode::IfChanged);

        assert!(!outcome.success);
        assert_eq!(
            outcome.entries.last(),
            Some(&LogEntry::error(
                "The content of data file 'Foo.cs.json' is not an object but an array."
            ))
        );
        assert!(fs.contents("/t/Foo.cs").is_none());
    }

    #[test]
    fn template_without_extension_fails_the_unit() {
        let fs = MemoryFileSystem::new();
        let outcome = render_templates(&fs, &["/t/Makefile"], WriteMode::IfChanged);
        assert!(!outcome.success);
        assert!(matches!(outcome.units[0], UnitOutcome::Failed { .. }));
    }

    #[test]
    fn dry_run_reports_pending_writes() {
        let fs = MemoryFileSystem::new()
            .with_file("/t/Foo.cs.mustache", "{{a}}")
            .with_file("/t/Foo.cs.json", r#"{ "a": 1 }"#);
        let outcome = render_templates(&fs, &["/t/Foo.cs.mustache"], WriteMode::DryRun);

        assert!(outcome.success);
        assert!(fs.contents("/t/Foo.cs").is_none());
        let changed: Vec<_> = outcome.changed_outputs().collect();
        assert_eq!(changed, [Path::new("/t/Foo.cs")]);
        assert_eq!(
            outcome.entries[1].message,
            "The file '/t/Foo.cs' would be updated from template '/t/Foo.cs.mustache'."
        );
    }

    /// Reports every file as present but fails every read.
    struct UnreadableFileSystem;

    impl FileSystem for UnreadableFileSystem {
        fn exists(&self, _path: &Path) -> bool {
            true
        }

        fn read_bytes(&self, _path: &Path) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"))
        }

        fn write_bytes(&self, _path: &Path, _contents: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"))
        }

        fn modified(&self, _path: &Path) -> io::Result<SystemTime> {
            Ok(SystemTime::UNIX_EPOCH)
        }
    }

    #[test]
    fn faults_log_cause_chain() {
        let outcome =
            render_templates(&UnreadableFileSystem, &["/t/Foo.cs.mustache"], WriteMode::IfChanged);
        assert!(!outcome.success);
        let error = outcome.entries_of(Severity::Error).next().unwrap();
        assert_eq!(
            error.message,
            "I/O error at /t/Foo.cs.json\n  caused by: access denied"
        );
    }
}
