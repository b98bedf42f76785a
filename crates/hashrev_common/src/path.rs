//! Path helpers shared by pipeline stages.

use std::path::{Component, Path, PathBuf};

/// Returns `path` relative to `base` as a `/`-separated string.
///
/// When `path` does not live under `base` the whole path is returned, still
/// normalized to forward slashes.
pub fn rel_path(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Lexically normalizes a path, resolving `.` and `..` components.
///
/// The filesystem is never consulted. A `..` that would climb above the
/// root of an absolute path is dropped; on a relative path it is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
