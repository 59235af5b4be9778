//! In-process ONNX embedding provider

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::EmbeddingConfig;
use crate::embeddings::OnnxEmbedder;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Wraps `OnnxEmbedder`, which needs exclusive access to its session
pub struct OnnxEmbeddingProvider {
    embedder: Arc<Mutex<OnnxEmbedder>>,
    dimensions: usize,
}

impl OnnxEmbeddingProvider {
    /// Load (downloading if needed) the model named in `config`
    pub async fn new(config: &EmbeddingConfig) -> Result<Self> {
        let embedder = OnnxEmbedder::new(config).await?;
        let dimensions = embedder.dimensions();
        Ok(Self {
            embedder: Arc::new(Mutex::new(embedder)),
            dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || embedder.lock().embed_one(&text))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let embedder = Arc::clone(&self.embedder);
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            embedder.lock().embed_batch(&refs)
        })
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
