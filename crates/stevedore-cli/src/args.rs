//! CLI argument surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "stevedore",
    version,
    about = "Package user code into deterministic, content-addressable archives"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a module snapshot and archive the user-code subset.
    Package {
        /// Source file or package root to package from.
        #[arg(long)]
        source: PathBuf,

        /// Output archive path.
        #[arg(long)]
        dest: PathBuf,

        /// Dotted module name, used for log traceability only.
        #[arg(long = "module-name")]
        module_name: String,

        /// JSON snapshot of loaded modules: an array of
        /// {"name": ..., "file": ...} objects.
        #[arg(long)]
        modules: PathBuf,

        /// Installed-library root to exclude; repeatable.
        #[arg(long = "library-root")]
        library_roots: Vec<PathBuf>,
    },

    /// Hash a file and print the digest used as its version key.
    Hash {
        /// File to hash.
        file: PathBuf,
    },
}
