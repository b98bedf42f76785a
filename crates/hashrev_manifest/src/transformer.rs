//! Pluggable encoding of the manifest table.

use std::collections::BTreeMap;

use crate::error::TransformError;

/// Original relative path → revisioned relative path, sorted by key.
pub type ManifestTable = BTreeMap<String, String>;

/// Encodes and decodes a manifest table.
///
/// Implementations must render the table in key order with two-space
/// indentation so that identical runs produce byte-identical manifests.
pub trait Transformer {
    /// Decodes a previously written manifest.
    fn parse(&self, text: &str) -> Result<ManifestTable, TransformError>;

    /// Encodes a manifest table.
    fn stringify(&self, table: &ManifestTable) -> Result<String, TransformError>;
}

/// The default JSON encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransformer;

impl Transformer for JsonTransformer {
    fn parse(&self, text: &str) -> Result<ManifestTable, TransformError> {
        serde_json::from_str(text).map_err(|e| TransformError::Parse {
            reason: e.to_string(),
        })
    }

    fn stringify(&self, table: &ManifestTable) -> Result<String, TransformError> {
        serde_json::to_string_pretty(table).map_err(|e| TransformError::Stringify {
            reason: e.to_string(),
        })
    }
}
