//! Content-hash revisioning of build artifacts.
//!
//! The [`RevisionEngine`] renames each file after the fingerprint of its
//! content using a [`FilenameCodec`], and holds debug maps back until the end
//! of the run so they can be renamed after the artifact they describe.

#![warn(missing_docs)]

pub mod codec;
pub mod engine;
pub mod error;
pub mod sourcemap;

pub use codec::{query_url, Encoding, FilenameCodec};
pub use engine::{EngineOptions, RevisionEngine};
pub use error::RevError;
