//! Parsing and validation of `hashrev.toml` configuration files.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`ProjectConfig`] holding the revision and manifest settings.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use types::*;
