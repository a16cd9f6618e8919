//! Packaging root resolution.

use std::path::{Path, PathBuf};

/// File whose presence signals that a directory is part of a
/// hierarchical package.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Find the root of the project for a given source file.
///
/// The root is the first ancestor of `source_path` that does not contain
/// a package marker, starting the walk from the file's parent. Used only
/// when the caller has not supplied an explicit root.
///
/// N.B.: this assumption only holds for regular packages. Marker-less
/// (namespace-style) packages are invisible to the walk, which then
/// stops at a shallower ancestor than intended.
pub fn find_project_root(source_path: &Path) -> PathBuf {
    let mut dir = match source_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if let Ok(resolved) = dir.canonicalize() {
        dir = resolved;
    }
    while dir.join(PACKAGE_MARKER).exists() {
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => break,
        }
    }
    dir
}
