//! HTTP route definitions.
//!
//! ```text
//! GET  /       - health check
//! POST /scan   - run one scan
//! /scans/*     - captured screenshots (static files)
//! ```

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let scans = ServeDir::new(state.screenshots.dir());

    Router::new()
        .route("/", get(handlers::health))
        .route("/scan", post(handlers::scan))
        .nest_service("/scans", scans)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
