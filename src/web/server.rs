//! Web server for filedrop.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::storage::UploadStorage;
use crate::{FiledropError, Result};

use super::auth::authorizer_for;
use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Request body limit derived from the upload ceiling.
///
/// Leaves room for multipart framing while keeping the handler's own size
/// check in charge of the 413 response.
fn body_limit_for(max_upload_bytes: u64) -> usize {
    (max_upload_bytes as usize) * 2 + 64 * 1024
}

/// Web server for the upload API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Raw request body limit in bytes.
    body_limit: usize,
}

impl WebServer {
    /// Create a new web server from the loaded configuration.
    ///
    /// Creates the upload directory; a directory that can neither be found
    /// nor created is a startup error.
    pub fn new(config: &Config) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| FiledropError::Config(format!("invalid server address: {e}")))?;

        let storage = UploadStorage::new(&config.upload.dir)?;
        tracing::info!("Upload storage initialized at: {}", config.upload.dir);

        let authorizer = authorizer_for(config.upload.auth_token.as_deref());
        if config.upload.auth_token.is_some() {
            tracing::info!("Upload token check enabled");
        }

        let app_state = AppState::new(storage, config.upload.max_upload_bytes, authorizer);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            body_limit: body_limit_for(config.upload.max_upload_bytes),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(&self) -> axum::Router {
        create_router(self.app_state.clone(), self.body_limit).merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        // Connect info propagation lets the handler record the uploader address
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
