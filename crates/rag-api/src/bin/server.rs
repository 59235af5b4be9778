//! RAG API server binary
//!
//! Run with: cargo run -p rag-api --bin rag-api-server

use clap::Parser;
use rag_api::{config::RagConfig, server::RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rag-api-server", version, about = "Minimal RAG HTTP service")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "RAG_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!(
        "  - Embeddings: {:?} {} ({} dims)",
        config.embeddings.backend,
        config.embeddings.model,
        config.embeddings.dimensions
    );
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!(
        "  - Retrieval: top_k={}, threshold={}",
        config.retrieval.top_k,
        config.retrieval.similarity_threshold
    );

    let server = RagServer::new(config).await?;

    tracing::info!("Endpoints:");
    tracing::info!("  GET  /       - liveness");
    tracing::info!("  POST /query  - ask a question");

    server.start().await?;

    Ok(())
}
