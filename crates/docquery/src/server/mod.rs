//! HTTP server for the document query service

pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::DocQueryConfig;
use crate::error::Result;
use state::AppState;

/// Document query HTTP server
pub struct DocQueryServer {
    config: DocQueryConfig,
    state: AppState,
}

impl DocQueryServer {
    /// Create a new server
    pub async fn new(config: DocQueryConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| crate::error::Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state.clone());

        tracing::info!("Starting server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| crate::error::Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let max_upload_size = state.config().server.max_upload_size;
    let enable_cors = state.config().server.enable_cors;

    let mut router = Router::new()
        .route("/healthcheck", get(routes::health::healthcheck))
        .route(
            "/convert",
            post(routes::convert::convert_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/upload",
            post(routes::files::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/download/:file_id", get(routes::files::download_file))
        .route("/chat", post(routes::chat::chat))
        .route("/summary", post(routes::chat::summary))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
}
