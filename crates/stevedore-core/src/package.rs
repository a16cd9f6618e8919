//! The one-call packaging operation.

use crate::archive::build_archive;
use crate::classify::classify_modules;
use crate::error::PackResult;
use crate::root::find_project_root;
use crate::snapshot::{HostEnv, ModuleSnapshot};
use std::path::Path;
use tracing::{debug, info};

/// Package the user-code subset of `modules` into a deterministic
/// tar.gz at `destination`.
///
/// `source_path` is either a file, in which case the packaging root is
/// resolved by walking up from it, or the package root directory itself.
/// `module_name` is a dotted identifier carried only into log output for
/// traceability; it never influences classification or archive bytes.
///
/// The call runs to completion or to a hard failure; there is no retry
/// and no partial archive on failure. Callers running concurrent
/// packaging calls against the same destination must serialize them.
pub fn package_modules(
    source_path: &Path,
    destination: &Path,
    module_name: &str,
    modules: &[ModuleSnapshot],
    host: &HostEnv,
) -> PackResult<()> {
    let root = if source_path.is_dir() {
        source_path.to_path_buf()
    } else {
        find_project_root(source_path)
    };
    debug!(module = module_name, root = %root.display(), "resolved packaging root");

    let accepted = classify_modules(&root, modules, host);
    info!(
        module = module_name,
        files = accepted.len(),
        destination = %destination.display(),
        "packaging user code"
    );

    build_archive(&root, &accepted, destination)
}
