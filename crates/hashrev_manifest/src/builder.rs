//! The streaming manifest builder.
//!
//! Consumes the records emitted by the revision engine. Each revisioned
//! record contributes one entry keyed by where the file used to be asked
//! for: the revisioned file's relative directory joined with its original
//! file name. Records that were never revisioned are dropped. At the end of
//! the run the table is merged with the prior manifest when requested and
//! emitted as one file record.

use std::fmt;
use std::path::PathBuf;

use hashrev_common::{FileRecord, Transform};
use hashrev_engine::query_url;
use tracing::{debug, warn};

use crate::error::ManifestError;
use crate::reader::ManifestReader;
use crate::transformer::{JsonTransformer, ManifestTable, Transformer};

/// Default file name of the revision manifest.
pub const DEFAULT_MANIFEST_PATH: &str = "rev-manifest.json";

/// Configuration for a [`ManifestBuilder`].
pub struct ManifestOptions {
    /// Where the manifest is read from and emitted to, relative to `base`.
    pub path: PathBuf,
    /// Base of the emitted manifest record.
    pub base: PathBuf,
    /// Merge with the prior manifest, new entries winning on collision.
    pub merge: bool,
    /// Map to `original?v=<fp>` instead of the revisioned path.
    pub hash_in_query: bool,
    /// Encoding used to parse the prior manifest and write the new one.
    pub transformer: Box<dyn Transformer>,
}

impl ManifestOptions {
    /// Default options writing to `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets whether the prior manifest is merged in.
    pub fn merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Sets whether values carry the fingerprint as a query parameter.
    pub fn hash_in_query(mut self, hash_in_query: bool) -> Self {
        self.hash_in_query = hash_in_query;
        self
    }

    /// Sets the base of the emitted manifest record.
    pub fn base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    /// Replaces the manifest encoding.
    pub fn transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformer = Box::new(transformer);
        self
    }
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            base: PathBuf::new(),
            merge: false,
            hash_in_query: false,
            transformer: Box::new(JsonTransformer),
        }
    }
}

impl From<&str> for ManifestOptions {
    fn from(path: &str) -> Self {
        Self::with_path(path)
    }
}

impl fmt::Debug for ManifestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestOptions")
            .field("path", &self.path)
            .field("base", &self.base)
            .field("merge", &self.merge)
            .field("hash_in_query", &self.hash_in_query)
            .finish_non_exhaustive()
    }
}

/// Accumulates revision renames into a manifest.
pub struct ManifestBuilder<R> {
    options: ManifestOptions,
    reader: R,
    entries: ManifestTable,
}

impl<R: ManifestReader> ManifestBuilder<R> {
    /// Creates a builder for one run, reading prior manifests through `reader`.
    pub fn new(options: ManifestOptions, reader: R) -> Self {
        Self {
            options,
            reader,
            entries: ManifestTable::new(),
        }
    }

    /// Returns the entries collected so far.
    pub fn entries(&self) -> &ManifestTable {
        &self.entries
    }

    /// Records the rename carried by `record`, if it was revisioned.
    pub fn add(&mut self, record: &FileRecord) {
        let Some(original_path) = &record.original_path else {
            return;
        };
        if record.path.as_os_str().is_empty() {
            return;
        }

        let revisioned = record.relative();
        let original_name = original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let original = match revisioned.rfind('/') {
            Some(i) => format!("{}/{original_name}", &revisioned[..i]),
            None => original_name,
        };

        let value = match (self.options.hash_in_query, &record.fingerprint) {
            (true, Some(fp)) => query_url(&original, fp),
            _ => revisioned,
        };
        debug!(%original, %value, "manifest entry");
        self.entries.insert(original, value);
    }

    /// Produces the manifest record, consuming the collected entries.
    ///
    /// Returns `Ok(None)` when nothing was revisioned.
    pub fn build(&mut self) -> Result<Option<FileRecord>, ManifestError> {
        if self.entries.is_empty() {
            debug!("no revisioned files, skipping manifest");
            return Ok(None);
        }

        let path = &self.options.path;
        let prior = self.reader.read(path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;

        let mut table = match prior {
            Some(bytes) if self.options.merge => self.parse_prior(&bytes),
            _ => ManifestTable::new(),
        };
        table.append(&mut self.entries);

        let text = self
            .options
            .transformer
            .stringify(&table)
            .map_err(|source| ManifestError::Serialize {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), entries = table.len(), "built manifest");
        Ok(Some(FileRecord::buffer(
            self.options.base.clone(),
            self.options.base.join(path),
            text,
        )))
    }

    /// Decodes the prior manifest, treating any failure as empty.
    fn parse_prior(&self, bytes: &[u8]) -> ManifestTable {
        let parsed = std::str::from_utf8(bytes)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                self.options
                    .transformer
                    .parse(text)
                    .map_err(|e| e.to_string())
            });
        match parsed {
            Ok(table) => table,
            Err(reason) => {
                warn!(
                    path = %self.options.path.display(),
                    %reason,
                    "ignoring unreadable prior manifest"
                );
                ManifestTable::new()
            }
        }
    }
}

impl<R: ManifestReader> Transform for ManifestBuilder<R> {
    type Error = ManifestError;

    fn transform(&mut self, record: FileRecord) -> Result<Option<FileRecord>, ManifestError> {
        self.add(&record);
        Ok(None)
    }

    fn flush(&mut self) -> Result<Vec<FileRecord>, ManifestError> {
        Ok(self.build()?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::reader::MemoryManifestReader;
    use hashrev_common::{run_to_end, Contents};
    use std::io;
    use std::path::Path;

    fn revved(base: &str, original: &str, path: &str, fp: &str) -> FileRecord {
        let mut rec = FileRecord::buffer(base, path, "");
        rec.original_path = Some(PathBuf::from(original));
        rec.original_base = Some(PathBuf::from(base));
        rec.fingerprint = Some(fp.parse().unwrap());
        rec
    }

    fn text(record: &FileRecord) -> &str {
        std::str::from_utf8(record.bytes().unwrap()).unwrap()
    }

    fn builder(options: ManifestOptions) -> ManifestBuilder<MemoryManifestReader> {
        ManifestBuilder::new(options, MemoryManifestReader::new())
    }

    #[test]
    fn single_entry_keyed_by_original_name() {
        let mut b = builder(ManifestOptions::default());
        let out = run_to_end(
            &mut b,
            vec![revved(
                "/build",
                "/build/css/app.css",
                "/build/css/app-0123456789.css",
                "0123456789",
            )],
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relative(), "rev-manifest.json");
        assert_eq!(
            text(&out[0]),
            "{\n  \"css/app.css\": \"css/app-0123456789.css\"\n}"
        );
    }

    #[test]
    fn unrevisioned_records_are_dropped() {
        let mut b = builder(ManifestOptions::default());
        let out = run_to_end(
            &mut b,
            vec![
                FileRecord::buffer("/build", "/build/plain.txt", "x"),
                FileRecord::new("/build", "/build/dir", Contents::Null),
            ],
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn empty_run_emits_nothing_and_skips_read() {
        struct Failing;
        impl ManifestReader for Failing {
            fn read(&self, _: &Path) -> io::Result<Option<Vec<u8>>> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }
        let mut b = ManifestBuilder::new(ManifestOptions::default(), Failing);
        assert!(b.flush().unwrap().is_empty());
    }

    #[test]
    fn read_failure_is_fatal() {
        struct Failing;
        impl ManifestReader for Failing {
            fn read(&self, _: &Path) -> io::Result<Option<Vec<u8>>> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }
        let mut b = ManifestBuilder::new(ManifestOptions::default(), Failing);
        b.add(&revved("/b", "/b/a.js", "/b/a-0123456789.js", "0123456789"));
        let err = b.flush().unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn file_at_base_root_has_no_directory() {
        let mut b = builder(ManifestOptions::default());
        b.add(&revved("/b", "/b/a.js", "/b/a-0123456789.js", "0123456789"));
        assert_eq!(b.entries()["a.js"], "a-0123456789.js");
    }

    #[test]
    fn last_write_wins_for_same_key() {
        let mut b = builder(ManifestOptions::default());
        b.add(&revved("/b", "/b/a.js", "/b/a-0123456789.js", "0123456789"));
        b.add(&revved("/b", "/b/a.js", "/b/a-abcdefabcd.js", "abcdefabcd"));
        assert_eq!(b.entries().len(), 1);
        assert_eq!(b.entries()["a.js"], "a-abcdefabcd.js");
    }

    #[test]
    fn hash_in_query_values() {
        let mut b = builder(ManifestOptions::default().hash_in_query(true));
        b.add(&revved("/b", "/b/js/a.js", "/b/js/a.js", "0123456789"));
        assert_eq!(b.entries()["js/a.js"], "js/a.js?v=0123456789");
    }

    #[test]
    fn merge_with_prior_manifest() {
        let mut reader = MemoryManifestReader::new();
        reader.insert("rev-manifest.json", r#"{"old.js": "old-abc.js", "new.js": "stale.js"}"#);
        let mut b = ManifestBuilder::new(ManifestOptions::default().merge(true), reader);
        b.add(&revved("/b", "/b/new.js", "/b/new-def.js", "0123456789"));
        let out = b.flush().unwrap();
        assert_eq!(
            text(&out[0]),
            "{\n  \"new.js\": \"new-def.js\",\n  \"old.js\": \"old-abc.js\"\n}"
        );
    }

    #[test]
    fn prior_manifest_ignored_without_merge() {
        let mut reader = MemoryManifestReader::new();
        reader.insert("rev-manifest.json", r#"{"old.js": "old-abc.js"}"#);
        let mut b = ManifestBuilder::new(ManifestOptions::default(), reader);
        b.add(&revved("/b", "/b/new.js", "/b/new-def.js", "0123456789"));
        let out = b.flush().unwrap();
        assert!(!text(&out[0]).contains("old.js"));
    }

    #[test]
    fn corrupt_prior_manifest_is_treated_as_empty() {
        let mut reader = MemoryManifestReader::new();
        reader.insert("rev-manifest.json", "not json {{{");
        let mut b = ManifestBuilder::new(ManifestOptions::default().merge(true), reader);
        b.add(&revved("/b", "/b/new.js", "/b/new-def.js", "0123456789"));
        let out = b.flush().unwrap();
        assert_eq!(text(&out[0]), "{\n  \"new.js\": \"new-def.js\"\n}");
    }

    #[test]
    fn non_utf8_prior_manifest_is_treated_as_empty() {
        let mut reader = MemoryManifestReader::new();
        reader.insert("rev-manifest.json", vec![0xff, 0xfe, 0x00]);
        let mut b = ManifestBuilder::new(ManifestOptions::default().merge(true), reader);
        b.add(&revved("/b", "/b/new.js", "/b/new-def.js", "0123456789"));
        assert_eq!(b.flush().unwrap().len(), 1);
    }

    #[test]
    fn custom_path_and_base() {
        let mut b = builder(ManifestOptions::from("assets/manifest.json").base("/dist"));
        b.add(&revved("/b", "/b/a.js", "/b/a-0123456789.js", "0123456789"));
        let out = b.flush().unwrap();
        assert_eq!(out[0].path, PathBuf::from("/dist/assets/manifest.json"));
        assert_eq!(out[0].relative(), "assets/manifest.json");
    }

    #[test]
    fn custom_transformer_is_used() {
        struct Lines;
        impl Transformer for Lines {
            fn parse(&self, _: &str) -> Result<ManifestTable, TransformError> {
                Ok(ManifestTable::new())
            }
            fn stringify(&self, table: &ManifestTable) -> Result<String, TransformError> {
                Ok(table
                    .iter()
                    .map(|(k, v)| format!("{k} {v}\n"))
                    .collect())
            }
        }
        let mut b = builder(ManifestOptions::default().transformer(Lines));
        b.add(&revved("/b", "/b/b.js", "/b/b-0123456789.js", "0123456789"));
        b.add(&revved("/b", "/b/a.js", "/b/a-0123456789.js", "0123456789"));
        let out = b.flush().unwrap();
        assert_eq!(text(&out[0]), "a.js a-0123456789.js\nb.js b-0123456789.js\n");
    }

    #[test]
    fn stringify_failure_is_fatal() {
        struct Broken;
        impl Transformer for Broken {
            fn parse(&self, _: &str) -> Result<ManifestTable, TransformError> {
                Ok(ManifestTable::new())
            }
            fn stringify(&self, _: &ManifestTable) -> Result<String, TransformError> {
                Err(TransformError::Stringify {
                    reason: "broken".to_string(),
                })
            }
        }
        let mut b = builder(ManifestOptions::default().transformer(Broken));
        b.add(&revved("/b", "/b/a.js", "/b/a-0123456789.js", "0123456789"));
        assert!(matches!(
            b.flush().unwrap_err(),
            ManifestError::Serialize { .. }
        ));
    }

    #[test]
    fn options_debug_omits_transformer() {
        let dbg = format!("{:?}", ManifestOptions::default());
        assert!(dbg.contains("rev-manifest.json"));
        assert!(dbg.ends_with(".. }"));
    }
}
