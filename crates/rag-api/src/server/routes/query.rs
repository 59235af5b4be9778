//! Query endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /query - answer a question from the corpus
pub async fn handle_query(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|rejection| Error::invalid_input(rejection.body_text()))?;
    let query = request.validate(state.pipeline().defaults())?;

    tracing::info!("Query: \"{}\"", query.query);

    let answer = state
        .pipeline()
        .answer(&query.query, query.top_k, query.similarity_threshold)
        .await?;

    tracing::info!(
        "Query completed in {}ms, {} documents retrieved",
        start.elapsed().as_millis(),
        answer.retrieved.len()
    );

    Ok(Json(answer.into()))
}
