//! Unified diff support for `stache diff`.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use stache_core::{EncodingSpec, FileSystem};

use crate::error::{io_err, SyncError};
use crate::log::LogEntry;
use crate::pipeline::{render_templates, BatchOutcome, UnitOutcome};
use crate::writer::{WriteMode, WriteResult};

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diffs plus the dry-run batch they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    pub outcome: BatchOutcome,
    pub diffs: Vec<FileDiff>,
}

/// Render `templates` without writing and diff each pending output against
/// what is currently on disk. A missing output diffs against empty text.
///
/// An output that cannot be read is logged as an error in the outcome and
/// marks it failed; the other units are still diffed.
pub fn diff_templates<F, P>(fs: &F, templates: &[P]) -> DiffReport
where
    F: FileSystem + ?Sized,
    P: AsRef<Path>,
{
    let mut outcome = render_templates(fs, templates, WriteMode::DryRun);
    let mut diffs = Vec::new();
    let mut failures = Vec::new();
    for unit in &outcome.units {
        let UnitOutcome::Rendered {
            result,
            write: WriteResult::WouldWrite { path },
            encoding,
            ..
        } = unit
        else {
            continue;
        };
        match read_existing_or_empty(fs, path, *encoding) {
            Ok(existing) => diffs.push(FileDiff {
                path: path.clone(),
                unified_diff: unified_diff(path, &existing, &result.rendered_text),
            }),
            Err(err) => failures.push(LogEntry::error(err.diagnostic())),
        }
    }
    for failure in failures {
        outcome.push(failure);
    }
    DiffReport { outcome, diffs }
}

/// `a/<path>` → `b/<path>` unified diff with three lines of context.
pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let shown = path.strip_prefix("/").unwrap_or(path);
    let old_header = format!("a/{}", shown.display());
    let new_header = format!("b/{}", shown.display());
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

fn read_existing_or_empty<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    encoding: EncodingSpec,
) -> Result<String, SyncError> {
    if !fs.exists(path) {
        return Ok(String::new());
    }
    fs.read_text(path, encoding).map_err(|e| io_err(path, e))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::time::SystemTime;

    use stache_core::MemoryFileSystem;

    use super::*;
    use crate::log::Severity;

    fn fixture() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("/t/App.cfg.mustache", "name={{name}}\nport={{port}}\nmode=prod\n")
            .with_file("/t/App.cfg.json", r#"{ "name": "api", "port": 8080 }"#)
    }

    #[test]
    fn missing_output_diffs_against_empty() {
        let fs = fixture();
        let report = diff_templates(&fs, &["/t/App.cfg.mustache"]);
        assert_eq!(report.diffs.len(), 1);
        let diff = &report.diffs[0].unified_diff;
        assert!(diff.contains("+++ b/t/App.cfg"));
        assert!(diff.contains("+name=api"));
        assert!(fs.contents("/t/App.cfg").is_none(), "diff must not write");
    }

    #[test]
    fn no_diffs_after_render() {
        let fs = fixture();
        render_templates(&fs, &["/t/App.cfg.mustache"], WriteMode::IfChanged);
        let report = diff_templates(&fs, &["/t/App.cfg.mustache"]);
        assert!(report.diffs.is_empty());
        assert!(report.outcome.success);
    }

    #[test]
    fn local_edit_produces_unified_diff() {
        let fs = fixture();
        render_templates(&fs, &["/t/App.cfg.mustache"], WriteMode::IfChanged);
        fs.add_file("/t/App.cfg", "name=api\nport=9090\nmode=prod\n");

        let report = diff_templates(&fs, &["/t/App.cfg.mustache"]);
        let diff = &report.diffs[0].unified_diff;
        assert!(diff.contains("@@"));
        assert!(diff.contains("-port=9090"));
        assert!(diff.contains("+port=8080"));
        assert!(diff.contains(" mode=prod"));
    }

    /// Serves `inner`, but every read of `flaky` after the first fails.
    struct FlakyOutput {
        inner: MemoryFileSystem,
        flaky: PathBuf,
        reads: Cell<u32>,
    }

    impl FileSystem for FlakyOutput {
        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }

        fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
            if path == self.flaky {
                self.reads.set(self.reads.get() + 1);
                if self.reads.get() > 1 {
                    return Err(io::Error::new(io::ErrorKind::Other, "device went away"));
                }
            }
            self.inner.read_bytes(path)
        }

        fn write_bytes(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            self.inner.write_bytes(path, contents)
        }

        fn modified(&self, path: &Path) -> io::Result<SystemTime> {
            self.inner.modified(path)
        }
    }

    #[test]
    fn unreadable_output_does_not_drop_other_diffs() {
        let inner = fixture()
            .with_file("/t/App.cfg", "stale\n")
            .with_file("/t/Other.cfg.mustache", "other={{name}}\n")
            .with_file("/t/Other.cfg.json", r#"{ "name": "x" }"#);
        let fs = FlakyOutput {
            inner,
            flaky: PathBuf::from("/t/App.cfg"),
            reads: Cell::new(0),
        };

        let report = diff_templates(&fs, &["/t/App.cfg.mustache", "/t/Other.cfg.mustache"]);

        assert!(!report.outcome.success);
        assert_eq!(report.diffs.len(), 1);
        assert_eq!(report.diffs[0].path, PathBuf::from("/t/Other.cfg"));
        let error = report.outcome.entries_of(Severity::Error).next().unwrap();
        assert!(
            error.message.starts_with("I/O error at /t/App.cfg"),
            "got: {}",
            error.message
        );
    }
}
