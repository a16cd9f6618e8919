//! Staging and deterministic archive construction.
//!
//! Accepted files are first copied into a scratch staging tree that
//! mirrors their root-relative layout, then archived as a gzip-wrapped
//! tar stream. Both layers carry fixed metadata (zero mtime, zero
//! uid/gid, empty owner names, gzip OS byte 255), so identical
//! (path, content, mode) sets produce byte-identical archives
//! regardless of build host, clock, or user identity.

use crate::error::{PackError, PackResult};
use flate2::{Compression, GzBuilder};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tar::{Builder, Header};
use tempfile::TempDir;
use tracing::debug;

/// Stage the accepted files under a scratch tree and write a
/// deterministic tar.gz at `destination`.
///
/// The staging tree is removed on every exit path. A failure after the
/// destination file has been created unlinks the partial archive before
/// the error is returned.
pub fn build_archive(root: &Path, files: &[PathBuf], destination: &Path) -> PackResult<()> {
    let staging = TempDir::new().map_err(|source| PackError::DestinationUnwritable {
        path: std::env::temp_dir(),
        source,
    })?;

    stage_files(root, files, staging.path())?;

    write_tar_gz(staging.path(), destination).inspect_err(|_| {
        // Never leave a partial archive behind.
        let _ = fs::remove_file(destination);
    })
}

/// Copy each accepted relative path from under `root` into the staging
/// tree, creating intermediate directories as needed.
fn stage_files(root: &Path, files: &[PathBuf], staging: &Path) -> PackResult<()> {
    for rel in files {
        let src = root.join(rel);
        let dst = staging.join(rel);

        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|source| PackError::DestinationUnwritable {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        match fs::copy(&src, &dst) {
            Ok(_) => debug!(file = %rel.display(), "staged"),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(PackError::SourceVanished { path: src });
            }
            Err(source) => {
                return Err(PackError::Io {
                    context: format!("stage {}", rel.display()),
                    source,
                });
            }
        }
    }
    Ok(())
}

/// Collect regular files under `dir` as sorted paths relative to it.
fn collect_files(dir: &Path) -> PackResult<Vec<PathBuf>> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                walk(base, &path, out)?;
            } else if let Ok(rel) = path.strip_prefix(base) {
                out.push(rel.to_path_buf());
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    walk(dir, dir, &mut out).map_err(|source| PackError::Io {
        context: "walk staging tree".to_string(),
        source,
    })?;
    out.sort();
    Ok(out)
}

fn write_tar_gz(staging: &Path, destination: &Path) -> PackResult<()> {
    let out = File::create(destination).map_err(|source| PackError::DestinationUnwritable {
        path: destination.to_path_buf(),
        source,
    })?;

    let gz = GzBuilder::new()
        .mtime(0) // Epoch
        .operating_system(255) // Unknown (deterministic)
        .write(out, Compression::best());

    let mut tar = Builder::new(gz);
    tar.mode(tar::HeaderMode::Deterministic);

    for rel in collect_files(staging)? {
        append_normalized(&mut tar, staging, &rel).map_err(|source| PackError::Io {
            context: format!("archive {}", rel.display()),
            source,
        })?;
    }

    let gz = tar.into_inner().map_err(|source| PackError::Io {
        context: "finalize tar archive".to_string(),
        source,
    })?;
    gz.finish().map_err(|source| PackError::Io {
        context: "finish gzip stream".to_string(),
        source,
    })?;
    Ok(())
}

/// Append one staged file with normalized metadata: zero mtime, zero
/// uid/gid, empty owner names, mode taken from the staged file. Plain
/// GNU headers, no pax extensions.
fn append_normalized<W: Write>(
    tar: &mut Builder<W>,
    staging: &Path,
    rel: &Path,
) -> std::io::Result<()> {
    let full = staging.join(rel);
    let mut file = File::open(&full)?;
    let meta = file.metadata()?;

    let name = rel.to_string_lossy().replace('\\', "/");

    let mut header = Header::new_gnu();
    header.set_size(meta.len());
    header.set_mode(entry_mode(&meta));
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_username("")?;
    header.set_groupname("")?;

    tar.append_data(&mut header, &name, &mut file)
}

#[cfg(unix)]
fn entry_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn entry_mode(_meta: &fs::Metadata) -> u32 {
    0o644
}
