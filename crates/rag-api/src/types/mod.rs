//! Core types for the RAG service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Corpus, Document};
pub use query::QueryRequest;
pub use response::{Answer, QueryResponse, RetrievedDocument};
