//! Filesystem side of the host pipeline.
//!
//! Discovers input files, materializes them as file records, writes emitted
//! records to the output directory, and resolves the configuration file.

use std::path::{Path, PathBuf};

use hashrev_common::{Contents, FileRecord};
use hashrev_config::{ConfigError, ProjectConfig, CONFIG_FILE};

use crate::GlobalArgs;

/// Recursively discovers the files under `dir`, sorted by path.
///
/// The `hashrev.toml` at the root of `dir` is not an asset and is skipped.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    let config_path = dir.join(CONFIG_FILE);
    files.retain(|p| *p != config_path);
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Reads a file fully into memory as a record rooted at `base`.
pub fn read_record(base: &Path, path: &Path) -> std::io::Result<FileRecord> {
    let bytes = std::fs::read(path)?;
    Ok(FileRecord::buffer(base, path, bytes))
}

/// Writes `record` to `out_dir` at its relative path.
///
/// Null records become directories. Returns the written path.
pub fn write_record(out_dir: &Path, record: &FileRecord) -> std::io::Result<PathBuf> {
    let target = out_dir.join(record.relative());
    match &record.contents {
        Contents::Null => std::fs::create_dir_all(&target)?,
        Contents::Buffer(bytes) => {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, bytes)?;
        }
        Contents::Stream(_) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("cannot write unmaterialized stream {}", record.path.display()),
            ));
        }
    }
    Ok(target)
}

/// Loads the configuration named by `--config`, or `hashrev.toml` in `src`.
pub fn resolve_config(global: &GlobalArgs, src: &Path) -> Result<ProjectConfig, ConfigError> {
    match &global.config {
        Some(path) => hashrev_config::load_config_file(path),
        None => hashrev_config::load_config(src),
    }
}
