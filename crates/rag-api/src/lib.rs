//! rag-api: minimal retrieval-augmented generation over a fixed corpus
//!
//! The corpus is embedded once at startup into an exact squared-L2 index. Each query is
//! embedded, normalized, matched against the index, filtered by a similarity threshold and
//! handed to a chat-completion model together with the retrieved passages.

pub mod config;
#[cfg(feature = "onnx")]
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::RagPipeline;
pub use types::{
    document::{Corpus, Document},
    query::QueryRequest,
    response::{Answer, QueryResponse, RetrievedDocument},
};
