//! Configuration types deserialized from `hashrev.toml`.

use serde::Deserialize;

/// Default manifest file name, relative to the output directory.
pub const DEFAULT_MANIFEST_PATH: &str = "rev-manifest.json";

/// The top-level configuration parsed from `hashrev.toml`.
///
/// Every section is optional; a missing file behaves like an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Settings for renaming files.
    #[serde(default)]
    pub revision: RevisionConfig,
    /// Settings for the revision manifest.
    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// Settings for renaming files.
#[derive(Debug, Default, Deserialize)]
pub struct RevisionConfig {
    /// Leave names untouched and reference files with `?v=<fingerprint>`.
    #[serde(default)]
    pub hash_in_query: bool,
}

/// Settings for the revision manifest.
#[derive(Debug, Deserialize)]
pub struct ManifestConfig {
    /// Whether a manifest is produced at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Manifest path relative to the output directory.
    #[serde(default = "default_manifest_path")]
    pub path: String,
    /// Merge with the manifest left by the previous run.
    #[serde(default)]
    pub merge: bool,
    /// Write `original?v=<fingerprint>` values instead of revisioned paths.
    #[serde(default)]
    pub hash_in_query: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_manifest_path(),
            merge: false,
            hash_in_query: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_manifest_path() -> String {
    DEFAULT_MANIFEST_PATH.to_string()
}
