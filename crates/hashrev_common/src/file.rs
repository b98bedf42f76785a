//! File records that flow through a revisioning pipeline.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::hash::Fingerprint;
use crate::path::rel_path;

/// Extension (without the dot) that marks a file as a debug map.
pub const DEBUG_MAP_EXT: &str = "map";

/// The payload carried by a [`FileRecord`].
pub enum Contents {
    /// No content, e.g. a directory placeholder.
    Null,
    /// Fully materialized bytes.
    Buffer(Vec<u8>),
    /// An open reader that has not been read into memory.
    ///
    /// Revisioning needs the complete bytes to fingerprint a file, so stages
    /// reject records in this state.
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Null => write!(f, "Null"),
            Contents::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            Contents::Stream(_) => write!(f, "Stream(..)"),
        }
    }
}

/// One artifact moving through the pipeline.
///
/// `path` and `base` describe where the file currently lives. Once a record
/// has been revisioned, `original_path`, `original_base` and `fingerprint`
/// record where it came from and which content fingerprint renamed it.
#[derive(Debug)]
pub struct FileRecord {
    /// Current working path of the file.
    pub path: PathBuf,
    /// Root directory used to compute the file's relative path.
    pub base: PathBuf,
    /// File payload.
    pub contents: Contents,
    /// Path before revisioning, set by the revision engine.
    pub original_path: Option<PathBuf>,
    /// Base before revisioning, set by the revision engine.
    pub original_base: Option<PathBuf>,
    /// Fingerprint the file was revisioned with.
    pub fingerprint: Option<Fingerprint>,
}

impl FileRecord {
    /// Creates a record that has not been revisioned yet.
    pub fn new(base: impl Into<PathBuf>, path: impl Into<PathBuf>, contents: Contents) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            contents,
            original_path: None,
            original_base: None,
            fingerprint: None,
        }
    }

    /// Creates a record holding in-memory bytes.
    pub fn buffer(
        base: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(base, path, Contents::Buffer(bytes.into()))
    }

    /// Returns `true` if the record carries no content.
    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    /// Returns `true` if the content is an unmaterialized stream.
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    /// Returns the in-memory bytes, if the content is materialized.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns `true` if the file has the debug-map extension.
    pub fn is_debug_map(&self) -> bool {
        self.path.extension().and_then(|e| e.to_str()) == Some(DEBUG_MAP_EXT)
    }

    /// Returns `true` once the revision engine has renamed this record.
    pub fn is_revisioned(&self) -> bool {
        self.original_path.is_some()
    }

    /// Returns the final path component as UTF-8, if it has one.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Returns the directory containing the file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Returns the current path relative to `base`, with `/` separators.
    pub fn relative(&self) -> String {
        rel_path(&self.base, &self.path)
    }
}
