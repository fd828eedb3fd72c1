//! File-system capability.
//!
//! The orchestrator only touches files through [`FileSystem`], so batches can
//! be run against [`MemoryFileSystem`] in tests and [`RealFileSystem`] in
//! production.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::encoding::EncodingSpec;

/// Narrow file access used while rendering templates.
pub trait FileSystem {
    /// `true` if `path` names an existing regular file.
    fn exists(&self, path: &Path) -> bool;

    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the whole file, creating parent directories as needed.
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Last modification time.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Read and decode a text file. A BOM in the file overrides `encoding`.
    fn read_text(&self, path: &Path, encoding: EncodingSpec) -> io::Result<String> {
        Ok(encoding.decode(&self.read_bytes(path)?))
    }

    /// Encode and write a text file.
    fn write_text(&self, path: &Path, text: &str, encoding: EncodingSpec) -> io::Result<()> {
        self.write_bytes(path, &encoding.encode(text))
    }
}

// ---------------------------------------------------------------------------
// RealFileSystem
// ---------------------------------------------------------------------------

/// The local disk.
///
/// Writes go to `<path>.stache.tmp` first and are renamed over the target,
/// so a reader never observes a half-written output file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = PathBuf::from(format!("{}.stache.tmp", path.display()));
        std::fs::write(&tmp, contents)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

// ---------------------------------------------------------------------------
// MemoryFileSystem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct MemoryFile {
    contents: Vec<u8>,
    modified: SystemTime,
}

/// In-memory file system keyed by the exact `PathBuf` given.
///
/// Modification times come from a logical clock that advances one second per
/// write, so "was this file touched?" is observable without sleeping.
#[derive(Debug)]
pub struct MemoryFileSystem {
    files: RefCell<BTreeMap<PathBuf, MemoryFile>>,
    clock: Cell<u64>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        MemoryFileSystem {
            files: RefCell::new(BTreeMap::new()),
            clock: Cell::new(0),
        }
    }

    /// Builder-style [`add_file`](Self::add_file).
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, contents);
        self
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let modified = self.tick();
        self.files.borrow_mut().insert(
            path.into(),
            MemoryFile {
                contents: contents.into(),
                modified,
            },
        );
    }

    /// Raw bytes of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|file| file.contents.clone())
    }

    fn tick(&self) -> SystemTime {
        let now = self.clock.get() + 1;
        self.clock.set(now);
        UNIX_EPOCH + Duration::from_secs(now)
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("no such file: {}", path.display()),
    )
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.contents(path).ok_or_else(|| not_found(path))
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.files
            .borrow()
            .get(path)
            .map(|file| file.modified)
            .ok_or_else(|| not_found(path))
    }
}
