//! Shared directory access for LANSHARE.
//!
//! This module is the core of the file sharing service:
//! - Enumerating the regular files of the shared directory with sizes
//! - Resolving requested filenames to safe paths for download
//! - Persisting uploads under their submitted name
//!
//! All operations are synchronous filesystem calls; the web layer moves
//! them onto the blocking thread pool.

mod listing;
mod resolver;
mod storage;

use std::io::Read;
use std::path::{Path, PathBuf};

pub use listing::{format_size_kb, is_listed_name, FileEntry, EXCLUDED_SUBSTRING};
pub use resolver::{validate_name, Resolved};
pub use storage::{StoreReceipt, TEMP_PREFIX};

use crate::Result;

/// Access to one shared directory.
///
/// The base directory is fixed at construction; every listing, download
/// and upload is rooted there.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// List the shared files.
    pub fn list(&self) -> Result<Vec<FileEntry>> {
        listing::list_dir(&self.base_path)
    }

    /// Resolve a requested filename.
    pub fn resolve(&self, name: &str) -> Result<Resolved> {
        resolver::resolve(&self.base_path, name)
    }

    /// Persist an uploaded stream under `name`, replacing any existing file.
    pub fn store<R: Read>(&self, name: &str, reader: R) -> Result<StoreReceipt> {
        storage::store(&self.base_path, name, reader)
    }
}
