//! Axum router setup for the Ontograph server

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{
    handlers::{build_graph, extract, health_check},
    ServerState,
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/graph", post(build_graph))
        .route("/api/extract", post(extract))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
