//! Linking deferred debug maps to the artifact they describe.
//!
//! A debug map must be renamed with its artifact's fingerprint, not its own,
//! so that `app-<fp>.js` is accompanied by `app-<fp>.js.map`. The artifact is
//! identified by the map's `file` property, falling back to the map's own
//! name without the `.map` suffix. Both are resolved against the directory
//! the map lives in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hashrev_common::{normalize, FileRecord, Fingerprint, DEBUG_MAP_EXT};
use serde::Deserialize;
use tracing::debug;

use crate::codec::FilenameCodec;

/// The only part of a debug map the linker reads.
#[derive(Deserialize)]
struct DebugMapHeader {
    #[serde(default)]
    file: Option<String>,
}

/// Resolves debug maps against the fingerprints of a finished main pass.
pub struct SourcemapLinker<'a> {
    codec: FilenameCodec,
    fingerprints: &'a HashMap<PathBuf, Fingerprint>,
}

impl<'a> SourcemapLinker<'a> {
    /// Creates a linker over a complete path → fingerprint table.
    pub fn new(codec: FilenameCodec, fingerprints: &'a HashMap<PathBuf, Fingerprint>) -> Self {
        Self {
            codec,
            fingerprints,
        }
    }

    /// Renames `map` after its artifact's fingerprint.
    ///
    /// Returns `false`, leaving the record untouched, when the artifact was
    /// not revisioned in this run or the map's own name is not UTF-8.
    pub fn link(&self, map: &mut FileRecord) -> bool {
        let target = artifact_path(map);
        let Some(fp) = self.fingerprints.get(&target).copied() else {
            debug!(
                map = %map.path.display(),
                artifact = %target.display(),
                "no revisioned artifact for debug map"
            );
            return false;
        };

        let Some(revisioned) = self.revisioned_map_path(&map.path, &fp) else {
            debug!(map = %map.path.display(), "debug map name is not UTF-8");
            return false;
        };
        debug!(
            from = %map.path.display(),
            to = %revisioned.display(),
            %fp,
            "linked debug map"
        );
        map.original_path = Some(std::mem::replace(&mut map.path, revisioned));
        map.original_base = Some(map.base.clone());
        map.fingerprint = Some(fp);
        true
    }

    /// Builds `<artifact name with fp>.map` next to the current map.
    fn revisioned_map_path(&self, path: &Path, fp: &Fingerprint) -> Option<PathBuf> {
        let name = path.file_name()?.to_str()?;
        let suffix = format!(".{DEBUG_MAP_EXT}");
        let artifact = name.strip_suffix(suffix.as_str()).unwrap_or(name);
        let reverted = self.codec.revert(artifact, fp);
        Some(path.with_file_name(format!("{}{suffix}", self.codec.apply(&reverted, fp))))
    }
}

/// Returns the name of the artifact a debug map describes.
///
/// Uses the map's `file` property when the contents parse as JSON and the
/// property is a non-empty string; otherwise the map's own file name with
/// the `.map` suffix removed.
pub fn artifact_name(map: &FileRecord) -> String {
    let declared = map
        .bytes()
        .and_then(|bytes| serde_json::from_slice::<DebugMapHeader>(bytes).ok())
        .and_then(|header| header.file)
        .filter(|file| !file.is_empty());
    if let Some(file) = declared {
        return file;
    }

    let name = map.file_name().unwrap_or_default();
    let suffix = format!(".{DEBUG_MAP_EXT}");
    name.strip_suffix(suffix.as_str()).unwrap_or(name).to_string()
}

/// Returns the artifact path a debug map describes, resolved against the
/// map's directory.
pub fn artifact_path(map: &FileRecord) -> PathBuf {
    normalize(&map.dir().join(artifact_name(map)))
}
