//! Access to the manifest written by a previous run.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Reads a previously persisted manifest.
///
/// `Ok(None)` means the manifest does not exist yet. Every other failure is
/// reported as an error and aborts manifest generation.
pub trait ManifestReader {
    /// Reads the manifest stored at `path`.
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;
}

/// Reads manifests from the filesystem, relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsManifestReader {
    root: PathBuf,
}

impl FsManifestReader {
    /// Creates a reader resolving relative manifest paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestReader for FsManifestReader {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory manifests keyed by path, for hosts without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryManifestReader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryManifestReader {
    /// Creates a reader with no stored manifests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `contents` at `path`, replacing any previous contents.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl ManifestReader for MemoryManifestReader {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        Ok(self.files.get(path).cloned())
    }
}
