//! Retrieval-augmented answer pipeline
//!
//! Built once at startup: the corpus is embedded and indexed, after which the pipeline is
//! read-only and can be shared across requests without locking.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{LlmConfig, RetrievalConfig};
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::{l2_normalize, select_documents, FlatL2Index};
use crate::types::{Answer, Corpus, RetrievedDocument};

/// Corpus, index and the providers used to answer queries
pub struct RagPipeline {
    corpus: Corpus,
    index: FlatL2Index,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    system_prompt: String,
    max_tokens: u32,
    defaults: RetrievalConfig,
}

impl RagPipeline {
    /// Embed every document of `corpus` and index the vectors as produced
    pub async fn build(
        corpus: Corpus,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        llm_config: &LlmConfig,
        defaults: RetrievalConfig,
    ) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::invalid_state("cannot build an index over an empty corpus"));
        }

        let start = Instant::now();
        let vectors = embedder.embed_batch(&corpus.texts()).await?;
        if vectors.len() != corpus.len() {
            return Err(Error::embedding(format!(
                "expected {} document embeddings, got {}",
                corpus.len(),
                vectors.len()
            )));
        }

        let mut index = FlatL2Index::new(embedder.dimensions());
        for vector in &vectors {
            index.add(vector)?;
        }

        tracing::info!(
            "Indexed {} documents ({} dims, {}) in {}ms",
            index.len(),
            index.dimensions(),
            embedder.name(),
            start.elapsed().as_millis()
        );

        Ok(Self {
            corpus,
            index,
            embedder,
            llm,
            system_prompt: llm_config.system_prompt.clone(),
            max_tokens: llm_config.max_tokens,
            defaults,
        })
    }

    /// The indexed corpus
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Retrieval defaults used when a request does not override them
    pub fn defaults(&self) -> &RetrievalConfig {
        &self.defaults
    }

    /// Documents grounding `query`, nearest first
    ///
    /// Never empty: when no candidate clears `similarity_threshold`, the single nearest
    /// document is returned.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        similarity_threshold: f32,
    ) -> Result<Vec<RetrievedDocument>> {
        if query.is_empty() {
            return Err(Error::invalid_input(crate::types::query::QUERY_REQUIRED));
        }
        if top_k == 0 {
            return Err(Error::invalid_input("top_k must be at least 1"));
        }

        let mut query_vector = self.embedder.embed(query).await?;
        l2_normalize(&mut query_vector);

        let hits = self.index.search(&query_vector, top_k)?;
        let documents = select_documents(&self.corpus, &hits, similarity_threshold);

        tracing::debug!(
            "Retrieved {} of {} candidates (threshold {})",
            documents.len(),
            hits.len(),
            similarity_threshold
        );

        Ok(documents)
    }

    /// Retrieve grounding documents and generate an answer from them
    pub async fn answer(
        &self,
        query: &str,
        top_k: usize,
        similarity_threshold: f32,
    ) -> Result<Answer> {
        let retrieved = self.retrieve(query, top_k, similarity_threshold).await?;

        let messages = PromptBuilder::build_messages(&self.system_prompt, query, &retrieved);
        tracing::info!(
            "Generating answer with {} ({} grounding documents)",
            self.llm.model(),
            retrieved.len()
        );

        let generated = self.llm.chat(&messages, self.max_tokens).await?;

        Ok(Answer {
            retrieved,
            response: generated.trim().to_string(),
        })
    }

    /// `answer` with the configured `top_k` and threshold
    pub async fn answer_with_defaults(&self, query: &str) -> Result<Answer> {
        self.answer(query, self.defaults.top_k, self.defaults.similarity_threshold)
            .await
    }
}
