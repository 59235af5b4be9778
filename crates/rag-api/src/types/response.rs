//! Retrieval and answer types

use serde::{Deserialize, Serialize};

/// A document kept by retrieval, with its raw distance and derived score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Corpus position
    pub id: usize,
    /// Passage text
    pub text: String,
    /// Squared L2 distance between the normalized query and the document vector
    pub distance: f32,
    /// `1 - distance`; not a cosine similarity, may fall outside [0, 1]
    pub similarity: f32,
}

/// Pipeline output for one query
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Grounding passages, nearest first
    pub retrieved: Vec<RetrievedDocument>,
    /// Generated text, trimmed
    pub response: String,
}

impl Answer {
    /// Texts of the retrieved passages, nearest first
    pub fn retrieved_texts(&self) -> Vec<String> {
        self.retrieved.iter().map(|d| d.text.clone()).collect()
    }
}

/// Body of a successful `POST /query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Retrieved passage texts, nearest first
    pub retrieved_docs: Vec<String>,
    /// Generated answer
    pub response: String,
}

impl From<Answer> for QueryResponse {
    fn from(answer: Answer) -> Self {
        Self {
            retrieved_docs: answer.retrieved_texts(),
            response: answer.response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let answer = Answer {
            retrieved: vec![RetrievedDocument {
                id: 3,
                text: "The Moon landing happened in 1969.".to_string(),
                distance: 0.5,
                similarity: 0.5,
            }],
            response: "In 1969.".to_string(),
        };

        let value = serde_json::to_value(QueryResponse::from(answer)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "retrieved_docs": ["The Moon landing happened in 1969."],
                "response": "In 1969."
            })
        );
    }
}
