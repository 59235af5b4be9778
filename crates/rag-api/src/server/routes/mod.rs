//! Routes for the RAG server

pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Liveness text served at `/`
pub const LIVENESS_MESSAGE: &str = "RAG API is running!";

/// Build all routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/query", post(query::handle_query))
}

/// GET / - liveness check
async fn home() -> &'static str {
    LIVENESS_MESSAGE
}
