//! Command dispatch.

use crate::args::{Cli, Command};
use std::path::{Path, PathBuf};
use stevedore_core::{hash_file, load_snapshot, package_modules, HostEnv, PackResult};
use tracing::debug;

pub fn dispatch(cli: Cli) -> PackResult<()> {
    match cli.command {
        Command::Package {
            source,
            dest,
            module_name,
            modules,
            library_roots,
        } => run_package(&source, &dest, &module_name, &modules, library_roots),
        Command::Hash { file } => run_hash(&file),
    }
}

fn run_package(
    source: &Path,
    dest: &Path,
    module_name: &str,
    modules_path: &Path,
    library_roots: Vec<PathBuf>,
) -> PackResult<()> {
    let modules = load_snapshot(modules_path)?;
    let host = HostEnv::detect().with_library_roots(library_roots);
    debug!(
        snapshot = modules.len(),
        library_roots = host.library_roots.len(),
        "loaded module snapshot"
    );

    package_modules(source, dest, module_name, &modules, &host)?;

    // The archive digest doubles as the version key downstream.
    let digest = hash_file(dest)?;
    println!(
        "{}",
        serde_json::json!({
            "archive": dest.display().to_string(),
            "digest": digest.hex,
            "bytes": digest.len,
        })
    );
    Ok(())
}

fn run_hash(file: &Path) -> PackResult<()> {
    let digest = hash_file(file)?;
    println!(
        "{}",
        serde_json::json!({
            "file": file.display().to_string(),
            "digest": digest.hex,
            "bytes": digest.len,
        })
    );
    Ok(())
}
