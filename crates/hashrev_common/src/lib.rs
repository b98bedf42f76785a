//! Shared foundational types for the hashrev asset revisioning toolchain.
//!
//! This crate provides content fingerprints, the file records that flow through
//! a revisioning pipeline, the [`Transform`] contract every pipeline stage
//! implements, and path helpers shared by the engine and the manifest builder.

#![warn(missing_docs)]

pub mod file;
pub mod hash;
pub mod path;
pub mod stream;

pub use file::{Contents, FileRecord, DEBUG_MAP_EXT};
pub use hash::{Fingerprint, ParseFingerprintError, FINGERPRINT_HEX_LEN};
pub use path::{normalize, rel_path};
pub use stream::{run_to_end, Transform};
