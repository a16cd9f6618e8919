pub mod archive;
pub mod classify;
pub mod digest;
pub mod error;
pub mod package;
pub mod root;
pub mod snapshot;

// Convenience re-exports
pub use archive::build_archive;
pub use classify::{classify_modules, common_path};
pub use digest::{hash_file, hash_file_with_chunk_size, FileDigest};
pub use error::{PackError, PackResult};
pub use package::package_modules;
pub use root::{find_project_root, PACKAGE_MARKER};
pub use snapshot::{load_snapshot, HostEnv, ModuleSnapshot};
