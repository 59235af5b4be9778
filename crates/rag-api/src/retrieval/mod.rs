//! Exact nearest-neighbour retrieval

pub mod index;
pub mod search;

pub use index::{l2_normalize, FlatL2Index, Neighbor};
pub use search::select_documents;
