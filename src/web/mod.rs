//! Transfer gateway for LANSHARE.
//!
//! The HTTP shell around [`crate::file::FileStore`]: a listing page, file
//! downloads and multipart uploads.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use page::PageRenderer;
pub use router::create_router;
pub use server::WebServer;
