//! Brute-force similarity index — exact top-k search by inner product

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::error::{MatchError, Result};
use crate::vector::{dot, Strategy, Vector};

/// An append-then-freeze index over one run's candidate vectors.
///
/// Built once per matching run and immutable afterwards; positions are the
/// insertion order of the vectors handed to [`SimilarityIndex::build`].
/// Scores are inner products, which both embedders arrange to be cosine
/// similarities by unit-normalizing their output.
#[derive(Debug)]
pub struct SimilarityIndex {
    vectors: Vec<Vector>,
}

impl SimilarityIndex {
    /// Build an index from candidate vectors.
    ///
    /// Every vector must share one dimensionality and one strategy;
    /// violations fail before any search can observe them. An empty list
    /// builds an empty index whose searches return no results.
    pub fn build(vectors: Vec<Vector>) -> Result<Self> {
        if let Some(first) = vectors.first() {
            let strategy = first.strategy();
            let dimension = first.dimension();
            for vector in &vectors[1..] {
                if vector.strategy() != strategy {
                    return Err(MatchError::StrategyMismatch {
                        expected: strategy,
                        actual: vector.strategy(),
                    });
                }
                if vector.dimension() != dimension {
                    return Err(MatchError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.dimension(),
                    });
                }
            }
        }
        Ok(Self { vectors })
    }

    /// The number of vectors in this index.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The dimensionality of the stored vectors (None when empty).
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vector::dimension)
    }

    /// The strategy of the stored vectors (None when empty).
    pub fn strategy(&self) -> Option<Strategy> {
        self.vectors.first().map(Vector::strategy)
    }

    /// Score `query` against every stored vector and return up to `k`
    /// `(position, score)` pairs, sorted by descending score with ties
    /// broken by ascending position.
    ///
    /// `k = 0` clamps to zero results. `k` larger than the index returns
    /// everything.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(usize, f32)>> {
        let Some(first) = self.vectors.first() else {
            return Ok(Vec::new());
        };

        if query.strategy() != first.strategy() {
            return Err(MatchError::StrategyMismatch {
                expected: first.strategy(),
                actual: query.strategy(),
            });
        }
        if !query.has_same_dimension(first) {
            return Err(MatchError::DimensionMismatch {
                expected: first.dimension(),
                actual: query.dimension(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .par_iter()
            .enumerate()
            .map(|(position, vector)| (position, dot(query, vector)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sparse(data: Vec<f32>) -> Vector {
        Vector::new(data, Strategy::SparseTfidf)
    }

    #[test]
    fn test_search_orders_by_score() {
        let index = SimilarityIndex::build(vec![
            sparse(vec![0.0, 1.0]),
            sparse(vec![1.0, 0.0]),
            sparse(vec![0.6, 0.8]),
        ])
        .unwrap();

        let results = index.search(&sparse(vec![1.0, 0.0]), 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 1);
        assert_relative_eq!(results[0].1, 1.0, epsilon = 1e-6);
        assert_eq!(results[1].0, 2);
        assert_eq!(results[2].0, 0);
    }

    #[test]
    fn test_ties_break_by_position() {
        let index = SimilarityIndex::build(vec![
            sparse(vec![1.0, 0.0]),
            sparse(vec![1.0, 0.0]),
            sparse(vec![1.0, 0.0]),
        ])
        .unwrap();

        let results = index.search(&sparse(vec![1.0, 0.0]), 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_larger_than_index_returns_all() {
        let index =
            SimilarityIndex::build(vec![sparse(vec![1.0, 0.0]), sparse(vec![0.0, 1.0])]).unwrap();
        let results = index.search(&sparse(vec![1.0, 1.0]), 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_search_k_zero() {
        let index = SimilarityIndex::build(vec![sparse(vec![1.0, 0.0])]).unwrap();
        let results = index.search(&sparse(vec![1.0, 0.0]), 0).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = SimilarityIndex::build(Vec::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), None);
        let results = index.search(&sparse(vec![1.0, 0.0]), 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_build_rejects_dimension_mismatch() {
        let result = SimilarityIndex::build(vec![sparse(vec![1.0, 0.0]), sparse(vec![1.0])]);
        assert!(matches!(
            result,
            Err(MatchError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_build_rejects_strategy_mismatch() {
        let result = SimilarityIndex::build(vec![
            sparse(vec![1.0, 0.0]),
            Vector::new(vec![0.0, 1.0], Strategy::DenseEmbedding),
        ]);
        assert!(matches!(result, Err(MatchError::StrategyMismatch { .. })));
    }

    #[test]
    fn test_search_rejects_mismatched_query() {
        let index = SimilarityIndex::build(vec![sparse(vec![1.0, 0.0])]).unwrap();

        let short = index.search(&sparse(vec![1.0]), 1);
        assert!(matches!(short, Err(MatchError::DimensionMismatch { .. })));

        let dense = index.search(&Vector::new(vec![1.0, 0.0], Strategy::DenseEmbedding), 1);
        assert!(matches!(dense, Err(MatchError::StrategyMismatch { .. })));
    }

    #[test]
    fn test_zero_vector_scores_zero_and_ranks_last() {
        let index = SimilarityIndex::build(vec![
            sparse(vec![0.0, 0.0]),
            sparse(vec![0.6, 0.8]),
        ])
        .unwrap();

        let results = index.search(&sparse(vec![0.6, 0.8]), 2).unwrap();
        assert_eq!(results[0].0, 1);
        assert_eq!(results[1].0, 0);
        assert_relative_eq!(results[1].1, 0.0, epsilon = 1e-6);
    }
}
