//! mibtree-std: Filesystem loader and CLI utilities
//!
//! Search-path configuration, per-directory module index caching and a
//! directory-backed [`ModuleSource`](mibtree_core::ModuleSource) for
//! native use of `mibtree-core`.

pub mod index_cache;
pub mod loader;
pub mod search_path;

pub use index_cache::{DirIndex, IndexCache};
pub use loader::{load_configured, load_file, open, DirectorySource};
pub use mibtree_core;
pub use search_path::{ModuleList, SearchConfig, SearchPath};
