//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Embedding width of all-MiniLM-L6-v2
pub const EMBEDDING_DIMENSIONS: usize = 384;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chat-completion configuration
    pub llm: LlmConfig,
    /// Retrieval defaults applied when a request does not override them
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Load configuration: defaults, then the optional TOML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str::<RagConfig>(&content)?
            }
            None => RagConfig::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply `OPENAI_API_KEY` and `OPENAI_BASE_URL` from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.is_empty()) {
            self.llm.base_url = url;
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS for all origins
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

/// Which embedding backend produces document and query vectors
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama server (all-minilm)
    #[default]
    Ollama,
    /// In-process ONNX Runtime (requires the `onnx` feature)
    Onnx,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend selection
    pub backend: EmbeddingBackend,
    /// Model name (Ollama tag, or sentence-transformers repo name for ONNX)
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Ollama base URL
    pub base_url: String,
    /// Batch size for ONNX inference
    pub batch_size: usize,
    /// Maximum sequence length for ONNX inference
    pub max_length: usize,
    /// Cache directory for ONNX model files
    pub cache_dir: PathBuf,
    /// Request timeout in seconds (none by default)
    pub timeout_secs: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            model: "all-minilm".to_string(),
            dimensions: EMBEDDING_DIMENSIONS,
            base_url: "http://localhost:11434".to_string(),
            batch_size: 32,
            max_length: 256,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rag-api")
                .join("models"),
            timeout_secs: None,
        }
    }
}

/// Chat-completion (OpenAI) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Cap on generated tokens
    pub max_tokens: u32,
    /// System message sent ahead of the templated prompt
    pub system_prompt: String,
    /// API key, normally taken from `OPENAI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds (none by default)
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 150,
            system_prompt: "You are a helpful assistant.".to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// Retrieval defaults
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Nearest neighbours fetched before filtering
    pub top_k: usize,
    /// Candidates must score strictly above this to be kept
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            similarity_threshold: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(config.server.enable_cors);
        assert_eq!(config.embeddings.dimensions, 384);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.max_tokens, 150);
        assert_eq!(config.retrieval.top_k, 3);
        assert!((config.retrieval.similarity_threshold - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RagConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [embeddings]
            backend = "onnx"
            model = "all-MiniLM-L6-v2"

            [retrieval]
            top_k = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.embeddings.backend, EmbeddingBackend::Onnx);
        assert_eq!(config.embeddings.dimensions, 384);
        assert_eq!(config.retrieval.top_k, 2);
        assert!((config.retrieval.similarity_threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.llm.max_tokens, 150);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RagConfig::default();
        config.apply_env_from(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "OPENAI_BASE_URL" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        // Empty values are ignored
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = RagConfig::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
    }
}
