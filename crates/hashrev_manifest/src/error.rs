//! Error types for manifest generation.

use std::path::PathBuf;

/// Fatal errors that abort manifest generation.
///
/// A missing prior manifest and a prior manifest that fails to parse are
/// not errors; both are treated as an empty prior manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Reading the prior manifest failed for a reason other than not found.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        /// The manifest path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The merged manifest could not be serialized.
    #[error("failed to serialize manifest {path}: {source}")]
    Serialize {
        /// The manifest path being produced.
        path: PathBuf,
        /// The transformer failure.
        source: TransformError,
    },
}

/// Errors raised by a manifest [`Transformer`](crate::Transformer).
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The text is not a valid manifest document.
    #[error("invalid manifest document: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// The table could not be encoded.
    #[error("cannot encode manifest: {reason}")]
    Stringify {
        /// Description of the encoding failure.
        reason: String,
    },
}
