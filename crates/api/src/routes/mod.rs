//! Route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod ws;

/// Creates the router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(ws::routes())
}
