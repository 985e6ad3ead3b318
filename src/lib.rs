//! LANSHARE - local network file sharing
//!
//! Serves one directory over HTTP: a browser can list its files, download
//! them and upload new ones into it.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod net;
pub mod template;
pub mod web;

pub use config::Config;
pub use error::{LanshareError, Result};
pub use file::{FileEntry, FileStore, Resolved, StoreReceipt};
pub use web::{AppState, PageRenderer, WebServer};
