//! Application state for the RAG server

use std::sync::Arc;

use crate::pipeline::RagPipeline;

/// Shared application state
///
/// The pipeline is immutable once built, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<RagPipeline>,
}

impl AppState {
    /// Wrap a built pipeline
    pub fn new(pipeline: RagPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Get the pipeline
    pub fn pipeline(&self) -> &RagPipeline {
        &self.pipeline
    }
}
