//! Flat index with exact squared-L2 search

use crate::error::{Error, Result};

/// A search hit: index entry and its squared L2 distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: usize,
    pub distance: f32,
}

/// Brute-force index over fixed-width vectors
///
/// Entry `i` is the `i`-th vector added. Vectors are stored as given; the index never
/// normalizes them.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimensions: usize,
    vectors: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of `dimensions` components
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: Vec::new(),
        }
    }

    /// Vector width
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.vectors.len() / self.dimensions
        }
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a vector; it receives the next id
    pub fn add(&mut self, vector: &[f32]) -> Result<usize> {
        self.check_dimensions(vector)?;
        let id = self.len();
        self.vectors.extend_from_slice(vector);
        Ok(id)
    }

    /// The `k` nearest entries by ascending squared L2 distance
    ///
    /// Returns fewer than `k` hits when the index holds fewer vectors. Ties keep insertion
    /// order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() {
            return Err(Error::invalid_state("search on an empty index"));
        }
        self.check_dimensions(query)?;

        let mut hits: Vec<Neighbor> = self
            .vectors
            .chunks_exact(self.dimensions)
            .enumerate()
            .map(|(id, vector)| Neighbor {
                id,
                distance: squared_l2(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "dimension mismatch: expected {}, got {}",
                self.dimensions,
                vector.len()
            )));
        }
        Ok(())
    }
}

/// Squared Euclidean distance
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Scale `vector` to unit L2 norm in place; zero vectors are left unchanged
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in vector.iter_mut() {
            *val /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FlatL2Index {
        let mut index = FlatL2Index::new(2);
        index.add(&[1.0, 0.0]).unwrap();
        index.add(&[0.0, 1.0]).unwrap();
        index.add(&[0.9, 0.3]).unwrap();
        index
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut index = FlatL2Index::new(2);
        assert_eq!(index.add(&[1.0, 2.0]).unwrap(), 0);
        assert_eq!(index.add(&[3.0, 4.0]).unwrap(), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_search_orders_by_distance() {
        let hits = index().search(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![0, 2, 1]);
        assert_eq!(hits[0].distance, 0.0);
        assert!((hits[1].distance - 0.1).abs() < 1e-6);
        assert!((hits[2].distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_truncates_to_k_and_len() {
        assert_eq!(index().search(&[1.0, 0.0], 1).unwrap().len(), 1);
        assert_eq!(index().search(&[1.0, 0.0], 10).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_index_is_invalid_state() {
        let index = FlatL2Index::new(2);
        assert!(matches!(
            index.search(&[1.0, 0.0], 1),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = index();
        assert!(index.add(&[1.0]).is_err());
        assert!(index.search(&[1.0, 0.0, 0.0], 1).is_err());
    }

    #[test]
    fn test_vectors_stored_unnormalized() {
        let mut index = FlatL2Index::new(2);
        index.add(&[3.0, 4.0]).unwrap();
        let hits = index.search(&[0.0, 0.0], 1).unwrap();
        assert!((hits[0].distance - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
