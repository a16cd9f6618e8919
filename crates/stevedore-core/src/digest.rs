//! Streaming content digests.

use crate::error::{PackError, PackResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default read-chunk size for streaming hashes.
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Digest of a file's content: raw bytes, hex form, and total length.
///
/// A pure function of the content; chunking granularity, file location,
/// and file metadata never influence it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Raw digest bytes.
    pub bytes: Vec<u8>,
    /// Lowercase hex rendering of the digest.
    pub hex: String,
    /// Total number of content bytes hashed.
    pub len: u64,
}

/// Hash a file and produce a digest to be used as a version key.
///
/// The file is streamed through SHA-256 in bounded chunks; it is never
/// read whole into memory.
pub fn hash_file(path: &Path) -> PackResult<FileDigest> {
    hash_file_with_chunk_size(path, DEFAULT_CHUNK_SIZE)
}

/// Same as [`hash_file`] with an explicit read-chunk size.
///
/// Any chunk size yields identical digest output; only peak memory
/// changes.
pub fn hash_file_with_chunk_size(path: &Path, chunk_size: usize) -> PackResult<FileDigest> {
    let mut file = File::open(path).map_err(|source| PackError::DigestRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut len: u64 = 0;

    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buf[..n]);
                len += n as u64;
            }
            // Spurious interrupts (signal delivery, ptrace) are not read
            // failures.
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(PackError::DigestRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    let raw = hasher.finalize();
    Ok(FileDigest {
        hex: hex::encode(raw),
        bytes: raw.to_vec(),
        len,
    })
}
