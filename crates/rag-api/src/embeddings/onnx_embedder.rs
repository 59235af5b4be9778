//! ONNX-based embedding generation
//!
//! Runs all-MiniLM-L6-v2 (or another sentence-transformers export) in process. Output follows
//! the sentence-transformers pipeline for that model: attention-masked mean pooling followed
//! by L2 normalization, giving 384-dimensional vectors.

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use crate::retrieval::l2_normalize;

/// ONNX-based text embedder
pub struct OnnxEmbedder {
    /// ONNX Runtime session
    session: Session,
    /// HuggingFace tokenizer
    tokenizer: Tokenizer,
    /// Embedding dimensions
    dimensions: usize,
    /// Maximum sequence length
    max_length: usize,
    /// Batch size
    batch_size: usize,
}

impl OnnxEmbedder {
    /// Create a new ONNX embedder, downloading model files into the cache on first use
    pub async fn new(config: &EmbeddingConfig) -> Result<Self> {
        let repo = huggingface_repo(&config.model);
        tracing::info!("Initializing ONNX embedder with model: {}", repo);

        let model_dir = cache_path(&config.cache_dir, &repo);
        std::fs::create_dir_all(&model_dir).map_err(|e| {
            Error::Config(format!("Failed to create cache directory: {}", e))
        })?;

        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            download(&repo, "onnx/model.onnx", &model_path).await?;
        }
        if !tokenizer_path.exists() {
            download(&repo, "tokenizer.json", &tokenizer_path).await?;
        }

        let session = Session::builder()
            .map_err(|e| Error::embedding(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::embedding(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(4)
            .map_err(|e| Error::embedding(format!("Failed to set threads: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| Error::embedding(format!("Failed to load model: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::embedding(format!("Failed to load tokenizer: {}", e)))?;

        tracing::info!("ONNX embedder initialized successfully");

        Ok(Self {
            session,
            tokenizer,
            dimensions: config.dimensions,
            max_length: config.max_length,
            batch_size: config.batch_size.max(1),
        })
    }

    /// Get embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed a single text
    pub fn embed_one(&mut self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text])?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("Empty embedding result"))
    }

    /// Embed multiple texts
    pub fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            all_embeddings.extend(self.embed_batch_internal(batch)?);
        }

        Ok(all_embeddings)
    }

    fn embed_batch_internal(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| Error::embedding(format!("Tokenization failed: {}", e)))?;
        let rows: Vec<_> = encodings
            .iter()
            .map(|e| (e.get_ids(), e.get_attention_mask(), e.get_type_ids()))
            .collect();
        let batch = TokenBatch::pack(&rows, self.max_length);

        let inputs = vec![
            ("input_ids", batch.tensor(&batch.input_ids)?.into_dyn()),
            ("attention_mask", batch.tensor(&batch.attention_mask)?.into_dyn()),
            ("token_type_ids", batch.tensor(&batch.token_type_ids)?.into_dyn()),
        ];
        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| Error::embedding(format!("Inference failed: {}", e)))?;

        // sentence-transformers exports name it; fall back to the first output otherwise
        let named: Vec<_> = outputs.iter().collect();
        let (_, token_states) = named
            .iter()
            .find(|(name, _)| *name == "last_hidden_state")
            .or_else(|| named.first())
            .ok_or_else(|| Error::embedding("Model returned no outputs"))?;
        let (shape, hidden) = token_states
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::embedding(format!("Failed to read token states: {}", e)))?;

        let width = shape
            .iter()
            .nth(2)
            .map(|&d| d as usize)
            .unwrap_or(self.dimensions);
        if width != self.dimensions {
            return Err(Error::embedding(format!(
                "model produced {}-dimensional output, configured for {}",
                width, self.dimensions
            )));
        }

        Ok(mean_pool(hidden, &batch.attention_mask, batch.seq_len, width))
    }
}

/// Tokenized batch padded to a common length, row-major
struct TokenBatch {
    rows: usize,
    seq_len: usize,
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

impl TokenBatch {
    /// Pad `(ids, mask, type_ids)` rows to the longest one, truncating at `max_length`
    fn pack(rows: &[(&[u32], &[u32], &[u32])], max_length: usize) -> Self {
        let seq_len = rows
            .iter()
            .map(|(ids, _, _)| ids.len())
            .max()
            .unwrap_or(0)
            .min(max_length);

        let mut batch = Self {
            rows: rows.len(),
            seq_len,
            input_ids: Vec::with_capacity(rows.len() * seq_len),
            attention_mask: Vec::with_capacity(rows.len() * seq_len),
            token_type_ids: Vec::with_capacity(rows.len() * seq_len),
        };

        for (ids, mask, types) in rows {
            pad_into(&mut batch.input_ids, ids, seq_len);
            pad_into(&mut batch.attention_mask, mask, seq_len);
            pad_into(&mut batch.token_type_ids, types, seq_len);
        }

        batch
    }

    /// `[rows, seq_len]` input tensor over one of the packed columns
    fn tensor(&self, data: &[i64]) -> Result<Tensor<i64>> {
        Tensor::from_array((
            vec![self.rows, self.seq_len],
            data.to_vec().into_boxed_slice(),
        ))
        .map_err(|e| Error::embedding(format!("Input tensor creation failed: {}", e)))
    }
}

fn pad_into(out: &mut Vec<i64>, values: &[u32], len: usize) {
    out.extend(values.iter().take(len).map(|&v| i64::from(v)));
    out.extend(std::iter::repeat(0).take(len.saturating_sub(values.len())));
}

/// Attention-masked mean pooling over token states, then L2 normalization
fn mean_pool(
    hidden: &[f32],
    attention_mask: &[i64],
    seq_len: usize,
    width: usize,
) -> Vec<Vec<f32>> {
    if seq_len == 0 || width == 0 {
        return Vec::new();
    }

    hidden
        .chunks(seq_len * width)
        .zip(attention_mask.chunks(seq_len))
        .map(|(states, mask)| {
            let mut pooled = vec![0.0f32; width];
            let mut kept = 0usize;

            for (state, _) in states.chunks(width).zip(mask).filter(|&(_, &m)| m > 0) {
                for (acc, value) in pooled.iter_mut().zip(state) {
                    *acc += value;
                }
                kept += 1;
            }

            if kept > 0 {
                pooled.iter_mut().for_each(|v| *v /= kept as f32);
            }
            l2_normalize(&mut pooled);
            pooled
        })
        .collect()
}

/// Map a configured model name to a HuggingFace repository
fn huggingface_repo(model: &str) -> String {
    match model {
        // Ollama's tag for the same model
        "all-minilm" => "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        m if m.contains('/') => m.to_string(),
        m => format!("sentence-transformers/{}", m),
    }
}

async fn download(repo: &str, file: &str, path: &Path) -> Result<()> {
    let url = format!("https://huggingface.co/{}/resolve/main/{}", repo, file);
    tracing::info!("Downloading {} from: {}", file, url);

    let response = reqwest::get(&url)
        .await
        .map_err(|e| Error::embedding(format!("Failed to download {}: {}", file, e)))?;

    if !response.status().is_success() {
        return Err(Error::embedding(format!(
            "Download of {} failed: HTTP {}",
            file,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::embedding(format!("Failed to read {} bytes: {}", file, e)))?;

    tokio::fs::write(path, &bytes).await?;
    tracing::info!("{} downloaded ({} bytes)", file, bytes.len());

    Ok(())
}

/// Per-model cache directory
fn cache_path(cache_dir: &Path, repo: &str) -> PathBuf {
    cache_dir.join(repo.replace('/', "--"))
}
