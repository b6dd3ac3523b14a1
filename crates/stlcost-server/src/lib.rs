//! HTTP upload service for filament cost quotes
//!
//! `POST /api/upload` takes a multipart form with a binary STL `file` and
//! optional `infill`, `material`, `model` and `layer_height` fields, and
//! answers with the formatted price and the full usage breakdown.

mod handlers;
mod types;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use stlcost::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handlers::*;
pub use types::*;

/// Room for multipart boundaries and text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Pricing policy, profile defaults and upload limit
    pub config: Arc<Config>,
}

impl AppState {
    /// Create state from a loaded configuration
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Build the router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .server
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/upload", post(upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the server
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!("Starting stlcost server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
