//! Threshold filtering over search hits

use crate::retrieval::index::Neighbor;
use crate::types::{Corpus, RetrievedDocument};

/// Turn raw hits into the documents handed to generation
///
/// Each hit scores `1 - distance`; hits scoring strictly above `threshold` are kept in
/// distance order. When none qualify, the nearest hit is returned alone whatever its score.
pub fn select_documents(
    corpus: &Corpus,
    hits: &[Neighbor],
    threshold: f32,
) -> Vec<RetrievedDocument> {
    let to_document = |hit: &Neighbor| {
        corpus.get(hit.id).map(|doc| RetrievedDocument {
            id: doc.id,
            text: doc.text.clone(),
            distance: hit.distance,
            similarity: 1.0 - hit.distance,
        })
    };

    let kept: Vec<RetrievedDocument> = hits
        .iter()
        .filter_map(to_document)
        .filter(|doc| doc.similarity > threshold)
        .collect();

    if !kept.is_empty() {
        return kept;
    }

    hits.first().and_then(to_document).into_iter().collect()
}
