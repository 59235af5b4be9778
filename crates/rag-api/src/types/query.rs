//! Query request payload

use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};

/// Message returned when the query is absent or empty
pub const QUERY_REQUIRED: &str = "Query is required";

/// Body of `POST /query`
///
/// Every field is optional on the wire so that a missing `query` is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    #[serde(default)]
    pub query: Option<String>,

    /// Override for the number of neighbours to fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,

    /// Override for the similarity cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
}

/// A request that passed validation, with defaults resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    pub query: String,
    pub top_k: usize,
    pub similarity_threshold: f32,
}

impl QueryRequest {
    /// Create a request for `query` using server defaults
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Set the number of neighbours to fetch
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Set the similarity threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    /// Check the payload and fill in defaults
    pub fn validate(self, defaults: &RetrievalConfig) -> Result<ValidatedQuery> {
        let query = match self.query {
            Some(q) if !q.is_empty() => q,
            _ => return Err(Error::invalid_input(QUERY_REQUIRED)),
        };

        let top_k = self.top_k.unwrap_or(defaults.top_k);
        if top_k == 0 {
            return Err(Error::invalid_input("top_k must be at least 1"));
        }

        let similarity_threshold = self
            .similarity_threshold
            .unwrap_or(defaults.similarity_threshold);
        if !similarity_threshold.is_finite() {
            return Err(Error::invalid_input("similarity_threshold must be a finite number"));
        }

        Ok(ValidatedQuery {
            query,
            top_k,
            similarity_threshold,
        })
    }
}
