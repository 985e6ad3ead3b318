//! Web server for LANSHARE.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{FilesConfig, WebConfig};
use crate::Result;

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the transfer gateway.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Web configuration.
    web_config: WebConfig,
    /// Upload body limit in bytes.
    upload_limit: Option<usize>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(
        addr: SocketAddr,
        app_state: AppState,
        web_config: &WebConfig,
        files_config: &FilesConfig,
    ) -> Self {
        Self {
            addr,
            app_state: Arc::new(app_state),
            web_config: web_config.clone(),
            upload_limit: files_config.upload_limit_bytes(),
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Assemble the full router with optional static files and compression.
    fn build_router(self) -> Router {
        let mut router =
            create_router(self.app_state, self.upload_limit).merge(create_health_router());

        if self.web_config.serve_static {
            if let Some(static_router) = create_static_router(&self.web_config.static_path) {
                router = router.merge(static_router);
            }
        }

        if self.web_config.compression {
            router = router.layer(CompressionLayer::new());
        }

        router
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let base = self.app_state.store.base_path().display().to_string();
        let router = self.build_router();

        tracing::info!("Sharing {}", base);
        tracing::info!("Running on http://{} (Press CTRL+C to quit)", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.build_router();

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
