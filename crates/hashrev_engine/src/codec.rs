//! Reversible filename rewriting driven by a content fingerprint.
//!
//! A name is split at its first `.` into a head and a tail: `foo.min.js`
//! becomes `foo` + `.min.js`. In segment mode the fingerprint is attached to
//! the head (`foo-<fp>.min.js`), so the whole suffix chain, including the
//! outer file-type extension, survives verbatim. Query mode leaves the name
//! alone and carries the fingerprint as a `?v=` parameter instead.
//!
//! Every [`FilenameCodec::apply`] first reverts the given fingerprint, which
//! makes re-running the rewrite on an already revisioned name a no-op.

use std::path::{Path, PathBuf};

use hashrev_common::Fingerprint;

/// Separator placed between the name head and the fingerprint.
pub const FINGERPRINT_SEPARATOR: char = '-';

/// Query parameter that carries the fingerprint in query mode.
pub const QUERY_PARAM: &str = "v";

/// How a fingerprint is encoded into a file name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Embed the fingerprint as part of the name: `app-<fp>.js`.
    #[default]
    Segment,
    /// Keep the name and append `?v=<fp>` where it is referenced.
    Query,
}

impl Encoding {
    /// Selects query mode when `hash_in_query` is set.
    pub fn from_hash_in_query(hash_in_query: bool) -> Self {
        if hash_in_query {
            Encoding::Query
        } else {
            Encoding::Segment
        }
    }
}

/// Applies and reverts fingerprints on file names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilenameCodec {
    encoding: Encoding,
}

impl FilenameCodec {
    /// Creates a codec using the given encoding.
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }

    /// Inserts `fp` into `name`.
    ///
    /// Any copy of the same fingerprint already present is removed first. In
    /// query mode the name is otherwise returned unchanged.
    pub fn apply(&self, name: &str, fp: &Fingerprint) -> String {
        let reverted = self.revert(name, fp);
        match self.encoding {
            Encoding::Segment => {
                let (head, tail) = split_name(&reverted);
                format!("{head}{FINGERPRINT_SEPARATOR}{fp}{tail}")
            }
            Encoding::Query => reverted,
        }
    }

    /// Removes a previously applied `fp` from `name`, if present.
    pub fn revert(&self, name: &str, fp: &Fingerprint) -> String {
        let (head, tail) = split_name(name);
        let marker = format!("{FINGERPRINT_SEPARATOR}{fp}");
        match head.strip_suffix(marker.as_str()) {
            Some(stripped) => format!("{stripped}{tail}"),
            None => name.to_string(),
        }
    }

    /// Applies `fp` to the final component of `path`.
    ///
    /// Returns `None` when the path has no UTF-8 file name.
    pub fn apply_to_path(&self, path: &Path, fp: &Fingerprint) -> Option<PathBuf> {
        let name = path.file_name()?.to_str()?;
        Some(path.with_file_name(self.apply(name, fp)))
    }
}

/// Appends the fingerprint to a relative URL as a query parameter.
pub fn query_url(relative: &str, fp: &Fingerprint) -> String {
    format!("{relative}?{QUERY_PARAM}={fp}")
}

/// Splits a name at its first `.` into head and tail.
///
/// A leading dot counts like any other, so `.env` has an empty head.
fn split_name(name: &str) -> (&str, &str) {
    match name.find('.') {
        Some(i) => name.split_at(i),
        None => (name, ""),
    }
}
