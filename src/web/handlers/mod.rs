//! HTTP handlers for the transfer gateway.

pub mod file;

pub use file::*;

use crate::file::FileStore;
use crate::web::page::PageRenderer;

/// Application state shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    /// The shared directory.
    pub store: FileStore,
    /// Listing page renderer.
    pub pages: PageRenderer,
    /// Send downloads with an attachment disposition.
    pub force_download: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(store: FileStore, pages: PageRenderer) -> Self {
        Self {
            store,
            pages,
            force_download: false,
        }
    }

    /// Set whether downloads are forced to save instead of displaying inline.
    pub fn with_force_download(mut self, force_download: bool) -> Self {
        self.force_download = force_download;
        self
    }
}
