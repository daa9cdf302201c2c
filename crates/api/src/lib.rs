//! WebSocket relay for budget rooms.
//!
//! This crate provides:
//! - `GET /ws`: room membership and event fan-out
//! - `GET /health`: liveness and room count

pub mod routes;

use std::sync::Arc;

use axum::Router;
use tally_core::collab::RoomHub;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Room membership for every open connection.
    pub hub: Arc<RoomHub>,
}

impl AppState {
    /// Creates state with an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
