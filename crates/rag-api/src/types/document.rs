//! Document and corpus types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Passages served when no other corpus is supplied
pub const DEFAULT_PASSAGES: [&str; 5] = [
    "Ferdinand Magellan was a Portuguese explorer who led the first circumnavigation of the world.",
    "The Eiffel Tower is located in Paris, France.",
    "The Great Wall of China is one of the seven wonders of the world.",
    "The Moon landing happened in 1969.",
    "Water boils at 100 degrees Celsius at sea level.",
];

/// An immutable passage; `id` is its position in the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Position in the corpus, also the index entry id
    pub id: usize,
    /// Passage text
    pub text: String,
}

/// Ordered, immutable document set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from passages; identifiers follow input order
    pub fn new<I, S>(passages: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents: Vec<Document> = passages
            .into_iter()
            .enumerate()
            .map(|(id, text)| Document {
                id,
                text: text.into(),
            })
            .collect();

        if documents.is_empty() {
            return Err(Error::invalid_state("corpus must contain at least one document"));
        }

        Ok(Self { documents })
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false; construction rejects empty corpora
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by id
    pub fn get(&self, id: usize) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Iterate in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Passage texts in identifier order
    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.text.clone()).collect()
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self {
            documents: DEFAULT_PASSAGES
                .iter()
                .enumerate()
                .map(|(id, text)| Document {
                    id,
                    text: (*text).to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_corpus() {
        let corpus = Corpus::default();
        assert_eq!(corpus.len(), 5);
        assert_eq!(corpus.get(3).unwrap().text, "The Moon landing happened in 1969.");
        assert!(corpus.iter().enumerate().all(|(i, d)| d.id == i));
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let result = Corpus::new(Vec::<String>::new());
        assert!(matches!(result, Err(Error::InvalidState(_))));
    }
}
