//! Loaded-module snapshots and host-environment inputs.
//!
//! Both types are collaborator inputs supplied by the host environment:
//! the snapshot mirrors the set of modules loaded in the process being
//! packaged, and [`HostEnv`] carries the host-reported directories that
//! disqualify a file from packaging. Neither is mutated by this crate.

use crate::error::{PackError, PackResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One loaded module as observed by the host process at packaging time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    /// Dotted module name, when the host knows it.
    #[serde(default)]
    pub name: Option<String>,
    /// Absolute path of the file backing the module. Compiled-in,
    /// namespace-only, and synthetic modules carry no file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl ModuleSnapshot {
    /// A module backed by a source file.
    pub fn backed(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: Some(name.into()),
            file: Some(file.into()),
        }
    }

    /// A module with no resolvable backing file.
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            file: None,
        }
    }
}

/// Host-reported directories that disqualify a file from packaging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostEnv {
    /// Installed-library roots (site directories and friends).
    #[serde(default)]
    pub library_roots: Vec<PathBuf>,
    /// Directory containing the running executable.
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
}

impl HostEnv {
    /// Detect the executable directory from the current process.
    pub fn detect() -> Self {
        let bin_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            library_roots: Vec::new(),
            bin_dir,
        }
    }

    /// Replace the installed-library roots.
    pub fn with_library_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.library_roots = roots.into_iter().collect();
        self
    }
}

/// Load a module snapshot from a JSON file written by the host.
///
/// The file is a JSON array of `{"name": ..., "file": ...}` objects;
/// both fields are optional per entry.
pub fn load_snapshot(path: &Path) -> PackResult<Vec<ModuleSnapshot>> {
    let data = std::fs::read(path).map_err(|source| PackError::Io {
        context: format!("read module snapshot {}", path.display()),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| PackError::SnapshotParse {
        path: path.to_path_buf(),
        source,
    })
}
