//! Error types for the revision engine.

use std::path::PathBuf;

/// Fatal errors that abort a revisioning run.
///
/// Malformed debug maps and debug maps without a known artifact are not
/// errors; the engine recovers from both locally.
#[derive(Debug, thiserror::Error)]
pub enum RevError {
    /// A record's content is an open stream instead of in-memory bytes.
    #[error("streaming not supported: {path} must be read into memory before revisioning")]
    StreamingUnsupported {
        /// The offending file.
        path: PathBuf,
    },

    /// A record was pushed after the engine was flushed.
    #[error("revision engine already flushed, cannot accept {path}")]
    AlreadyFlushed {
        /// The file pushed too late.
        path: PathBuf,
    },
}
