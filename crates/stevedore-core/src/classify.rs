//! Module classification against a packaging root.
//!
//! Classification reads only path structure and filesystem metadata,
//! never file contents, and has no side effects. A candidate that cannot
//! be compared with the root (different volume, absolute vs relative) is
//! excluded like any other non-member; it never aborts the batch.

use crate::snapshot::{HostEnv, ModuleSnapshot};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Longest common ancestor of two paths, as a total function.
///
/// Returns `None` when the paths share nothing, including the
/// incomparable cases: different volume prefixes, or a mix of absolute
/// and relative paths. "No common ancestor" is an expected outcome here,
/// not a failure.
pub fn common_path(a: &Path, b: &Path) -> Option<PathBuf> {
    let mut shared = PathBuf::new();
    for (ca, cb) in a.components().zip(b.components()) {
        if ca != cb {
            break;
        }
        shared.push(ca.as_os_str());
    }
    if shared.as_os_str().is_empty() {
        None
    } else {
        Some(shared)
    }
}

/// Whether `file` lies under `dir` (`dir` itself is the common ancestor).
fn is_under(dir: &Path, file: &Path) -> bool {
    matches!(common_path(dir, file), Some(shared) if shared == dir)
}

/// Classify a loaded-module snapshot against a packaging root.
///
/// Ordered exclusion rules, first match wins:
/// 1. no resolvable backing file;
/// 2. file under one of the host-reported installed-library roots;
/// 3. file under the running executable's directory;
/// 4. file without the packaging root as a path ancestor.
///
/// Everything surviving is accepted and re-expressed relative to the
/// root.
pub fn classify_modules(
    root: &Path,
    modules: &[ModuleSnapshot],
    host: &HostEnv,
) -> Vec<PathBuf> {
    let mut accepted = Vec::new();

    for module in modules {
        let name = module.name.as_deref().unwrap_or("<unnamed>");
        let Some(file) = module.file.as_deref() else {
            debug!(module = name, "excluded: no backing file");
            continue;
        };

        // Installed packages and libraries are not user files. These can
        // sit beneath the source root when a virtualenv lives in the
        // working directory.
        if host.library_roots.iter().any(|lib| is_under(lib, file)) {
            debug!(module = name, file = %file.display(), "excluded: installed library");
            continue;
        }

        if let Some(bin) = host.bin_dir.as_deref() {
            if is_under(bin, file) {
                debug!(module = name, file = %file.display(), "excluded: executable directory");
                continue;
            }
        }

        match common_path(file, root) {
            Some(shared) if shared == root => {
                if let Ok(rel) = file.strip_prefix(root) {
                    accepted.push(rel.to_path_buf());
                }
            }
            _ => {
                debug!(module = name, file = %file.display(), "excluded: outside packaging root");
            }
        }
    }

    accepted
}
