//! HTTP boundary for the quote engine.
//!
//! - `POST /simulation`: public lead flow, sizing only
//! - `POST|PUT /simulation/commercial`: sizing plus prices, bearer token required
//!
//! Prices never leave the process except through the commercial routes.

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use tracing::info;

use crate::config::QuoteConfig;

pub use types::{CommercialRequest, CommercialResponse, ErrorResponse};

/// Immutable application state shared across all request handlers.
pub struct AppState {
    /// Catalogue, assumptions, and pricing used for every request.
    pub config: QuoteConfig,
    /// Token expected in `Authorization: Bearer <token>`. Commercial
    /// routes answer 403 when unset.
    pub commercial_token: Option<String>,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared configuration and commercial token
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/simulation", post(handlers::simulate))
        .route(
            "/simulation/commercial",
            post(handlers::simulate_commercial).put(handlers::simulate_commercial),
        )
        .with_state(state)
}

/// Binds to the given address and serves the API until the process stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
