//! Revision manifest generation.
//!
//! The [`ManifestBuilder`] collects the renames performed by the revision
//! engine into a sorted original → revisioned table, optionally merges it
//! with the manifest written by a previous run, and emits it as a single
//! serialized file record.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod reader;
pub mod transformer;

pub use builder::{ManifestBuilder, ManifestOptions, DEFAULT_MANIFEST_PATH};
pub use error::{ManifestError, TransformError};
pub use reader::{FsManifestReader, ManifestReader, MemoryManifestReader};
pub use transformer::{JsonTransformer, ManifestTable, Transformer};
