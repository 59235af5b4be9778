//! Provider abstractions for embeddings and chat completion
//!
//! The pipeline only sees the traits; the concrete backend is chosen from configuration.

pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod openai;

#[cfg(feature = "onnx")]
pub mod onnx;

use std::sync::Arc;

use crate::config::{EmbeddingBackend, EmbeddingConfig, LlmConfig};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use llm::{ChatMessage, ChatRole, LlmProvider};
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiClient;

/// Build the embedding provider selected by `config.backend`
pub async fn embedding_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.backend {
        EmbeddingBackend::Ollama => {
            tracing::info!(
                "Using Ollama embeddings ({} at {})",
                config.model,
                config.base_url
            );
            Ok(Arc::new(OllamaEmbedder::new(config)?))
        }
        EmbeddingBackend::Onnx => {
            #[cfg(feature = "onnx")]
            {
                tracing::info!("Using ONNX embeddings ({})", config.model);
                Ok(Arc::new(onnx::OnnxEmbeddingProvider::new(config).await?))
            }
            #[cfg(not(feature = "onnx"))]
            {
                Err(crate::error::Error::Config(
                    "ONNX backend selected but onnx feature is not enabled. \
                     Rebuild with --features onnx"
                        .to_string(),
                ))
            }
        }
    }
}

/// Build the chat-completion provider
pub fn llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; chat completion requests will be unauthenticated");
    }
    Ok(Arc::new(OpenAiClient::new(config)?))
}
