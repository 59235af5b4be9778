//! HTTP server for the RAG service

pub mod routes;
pub mod state;

use axum::Router;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{RagConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::pipeline::RagPipeline;
use crate::providers;
use crate::types::Corpus;
use state::AppState;

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create the providers named in `config`, then embed and index the default corpus
    pub async fn new(config: RagConfig) -> Result<Self> {
        let embedder = providers::embedding_provider(&config.embeddings).await?;
        let llm = providers::llm_provider(&config.llm)?;
        let pipeline = RagPipeline::build(
            Corpus::default(),
            embedder,
            llm,
            &config.llm,
            config.retrieval,
        )
        .await?;

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Serve an already built pipeline
    pub fn with_pipeline(config: RagConfig, pipeline: RagPipeline) -> Self {
        Self {
            config,
            state: AppState::new(pipeline),
        }
    }

    /// Router with all routes and middleware
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config.server)
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router over `state`
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let router = routes::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}
