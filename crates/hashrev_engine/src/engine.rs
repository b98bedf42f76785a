//! The streaming revision transform.
//!
//! Ordinary files are fingerprinted and renamed as soon as they arrive and
//! are forwarded in input order. Debug maps are queued instead: the artifact
//! they describe may not have been seen yet, so they are resolved by the
//! [`SourcemapLinker`] once the input is exhausted and every artifact
//! fingerprint is known.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hashrev_common::{normalize, FileRecord, Fingerprint, Transform};
use tracing::debug;

use crate::codec::{Encoding, FilenameCodec};
use crate::error::RevError;
use crate::sourcemap::SourcemapLinker;

/// Options for a [`RevisionEngine`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Keep file names as-is and carry the fingerprint as a query parameter.
    pub hash_in_query: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Accumulating,
    Finished,
}

/// Renames files after the fingerprint of their content.
///
/// One engine covers exactly one run. Records are pushed through
/// [`Transform::transform`] and the run ends with a single
/// [`Transform::flush`], which releases the deferred debug maps.
pub struct RevisionEngine {
    codec: FilenameCodec,
    /// Pre-revision path of every ordinary file → its fingerprint.
    fingerprints: HashMap<PathBuf, Fingerprint>,
    /// Debug maps in arrival order.
    deferred: Vec<FileRecord>,
    phase: Phase,
}

impl RevisionEngine {
    /// Creates an engine for a fresh run.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            codec: FilenameCodec::new(Encoding::from_hash_in_query(options.hash_in_query)),
            fingerprints: HashMap::new(),
            deferred: Vec::new(),
            phase: Phase::Accumulating,
        }
    }

    /// Returns the fingerprint recorded for a pre-revision path.
    pub fn fingerprint_of(&self, path: &Path) -> Option<Fingerprint> {
        self.fingerprints.get(&normalize(path)).copied()
    }

    /// Returns the number of debug maps waiting for the end of the run.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }
}

impl Default for RevisionEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl Transform for RevisionEngine {
    type Error = RevError;

    fn transform(&mut self, mut record: FileRecord) -> Result<Option<FileRecord>, RevError> {
        if self.phase == Phase::Finished {
            return Err(RevError::AlreadyFlushed { path: record.path });
        }
        if record.is_null() {
            return Ok(Some(record));
        }
        if record.is_stream() {
            return Err(RevError::StreamingUnsupported { path: record.path });
        }
        if record.is_debug_map() {
            debug!(path = %record.path.display(), "deferring debug map");
            self.deferred.push(record);
            return Ok(None);
        }

        let original = normalize(&record.path);
        if let Some(fp) = revision(self.codec, &mut record) {
            self.fingerprints.insert(original, fp);
        }
        Ok(Some(record))
    }

    fn flush(&mut self) -> Result<Vec<FileRecord>, RevError> {
        if self.phase == Phase::Finished {
            return Ok(Vec::new());
        }
        self.phase = Phase::Finished;

        let deferred = std::mem::take(&mut self.deferred);
        let linker = SourcemapLinker::new(self.codec, &self.fingerprints);
        let mut out = Vec::with_capacity(deferred.len());
        for mut map in deferred {
            if !linker.link(&mut map) {
                revision(self.codec, &mut map);
            }
            out.push(map);
        }
        Ok(out)
    }
}

/// Fingerprints a materialized record's own bytes and renames it.
///
/// A record without a UTF-8 file name cannot be renamed and is left
/// unrevisioned.
fn revision(codec: FilenameCodec, record: &mut FileRecord) -> Option<Fingerprint> {
    let fp = Fingerprint::from_bytes(record.bytes().unwrap_or_default());
    let Some(revisioned) = codec.apply_to_path(&record.path, &fp) else {
        debug!(path = %record.path.display(), "file name is not UTF-8, left unrevisioned");
        return None;
    };
    debug!(
        from = %record.path.display(),
        to = %revisioned.display(),
        %fp,
        "revisioned"
    );
    record.original_path = Some(std::mem::replace(&mut record.path, revisioned));
    record.original_base = Some(record.base.clone());
    record.fingerprint = Some(fp);
    Some(fp)
}
