//! Error types for the packaging core.

use std::path::PathBuf;

/// Packaging errors.
///
/// Classification exclusions and cross-volume incomparable paths are not
/// errors and never appear here: the former are expected non-membership,
/// the latter resolve to "no common ancestor" inside the classifier.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// A classified file disappeared between classification and copy.
    #[error("source file vanished before staging: {}", path.display())]
    SourceVanished { path: PathBuf },

    /// Staging or destination location cannot be created or written.
    #[error("destination not writable: {}: {source}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while streaming a file through the digest.
    #[error("digest read failed: {}: {source}", path.display())]
    DigestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Module snapshot file could not be parsed.
    #[error("invalid module snapshot: {}: {source}", path.display())]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Residual I/O failure during staging or archiving.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PackError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Input issues
            Self::SnapshotParse { .. } => 1,

            // Destination issues
            Self::DestinationUnwritable { .. } => 3,

            // Source tree mutated under us
            Self::SourceVanished { .. } => 4,

            // Hashing
            Self::DigestRead { .. } => 5,

            // Other
            Self::Io { .. } => 6,
        }
    }
}

/// Result type for packaging operations.
pub type PackResult<T> = Result<T, PackError>;
