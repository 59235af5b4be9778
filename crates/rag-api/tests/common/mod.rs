//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use rag_api::config::{LlmConfig, RetrievalConfig, ServerConfig};
use rag_api::providers::{ChatMessage, EmbeddingProvider, LlmProvider};
use rag_api::server::{build_router, state::AppState};
use rag_api::{Corpus, Error, RagPipeline, Result};

pub const MOON_DOC: &str = "The Moon landing happened in 1969.";
pub const MOON_QUERY: &str = "When did humans land on the Moon?";

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "of", "on", "in", "is", "at", "was", "who", "did", "when", "one", "to",
    "and",
];

/// Bag-of-words embedder: every distinct content word gets its own axis
///
/// Vectors are raw term counts, so they are deterministic and unnormalized.
pub struct VocabularyEmbedder {
    dimensions: usize,
    vocabulary: Mutex<HashMap<String, usize>>,
}

impl VocabularyEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vocabulary: Mutex::new(HashMap::new()),
        }
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let mut vocabulary = self.vocabulary.lock();

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|t| !t.is_empty() && !STOPWORDS.contains(&t.as_str()))
        {
            let next = vocabulary.len();
            let axis = *vocabulary.entry(token).or_insert(next);
            if axis < self.dimensions {
                vector[axis] += 1.0;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for VocabularyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "vocabulary"
    }
}

/// Replies with a fixed answer padded with whitespace, recording each exchange
#[derive(Default)]
pub struct CannedLlm {
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl LlmProvider for CannedLlm {
    async fn chat(&self, messages: &[ChatMessage], _max_tokens: u32) -> Result<String> {
        self.requests.lock().push(messages.to_vec());
        Ok("  Humans first landed on the Moon in 1969.\n".to_string())
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned-model"
    }
}

/// Always fails like an unreachable upstream
pub struct UnavailableLlm;

#[async_trait]
impl LlmProvider for UnavailableLlm {
    async fn chat(&self, _messages: &[ChatMessage], _max_tokens: u32) -> Result<String> {
        Err(Error::llm("Chat completion failed: HTTP 503 Service Unavailable"))
    }

    fn name(&self) -> &str {
        "unavailable"
    }

    fn model(&self) -> &str {
        "unavailable-model"
    }
}

pub async fn pipeline(llm: Arc<dyn LlmProvider>) -> RagPipeline {
    RagPipeline::build(
        Corpus::default(),
        Arc::new(VocabularyEmbedder::new(384)),
        llm,
        &LlmConfig::default(),
        RetrievalConfig::default(),
    )
    .await
    .expect("pipeline builds")
}

pub async fn router(llm: Arc<dyn LlmProvider>) -> axum::Router {
    build_router(AppState::new(pipeline(llm).await), &ServerConfig::default())
}

/// Serve `router` on an ephemeral local port, returning its base URL
pub async fn spawn(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{}", addr)
}
