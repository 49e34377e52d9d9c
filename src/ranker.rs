//! Orchestrates a matching run: embed, index, search, explain.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::embed::Embedder;
use crate::error::Result;
use crate::index::SimilarityIndex;
use crate::overlap::overlap_terms;
use crate::text::english_stopwords;

/// A document entering a matching run. Identity is `id`; `text` is the
/// already-extracted plain text and is never reparsed here.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Configuration for one matching run.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// How many candidates to return per query
    pub top_k: usize,
    /// Cap on overlap terms attached to each result
    pub overlap_limit: usize,
    /// Drop stop words from the overlap explanation
    pub exclude_stopwords_in_overlap: bool,
    /// Stop-word set used by normalization and (optionally) overlap
    pub stopwords: HashSet<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            overlap_limit: 10,
            exclude_stopwords_in_overlap: false,
            stopwords: english_stopwords(),
        }
    }
}

/// One ranked candidate for one query.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub query_id: String,
    pub candidate_id: String,
    pub score: f32,
    /// 1-based position in score order
    pub rank: usize,
    pub overlap_terms: Vec<String>,
}

/// Rank every candidate against every query with one embedder.
///
/// Returns, per query id, `min(top_k, candidates.len())` results sorted by
/// descending score (ties by candidate slice order). Zero queries yield an
/// empty map; zero candidates yield an empty list per query. Empty documents
/// embed to zero vectors and rank last rather than aborting the run. Errors
/// surface only for structural violations (dimension or strategy mismatch,
/// embedding backend failure), and always before any result is produced.
pub fn rank<E: Embedder>(
    embedder: &mut E,
    queries: &[Document],
    candidates: &[Document],
    config: &MatchConfig,
) -> Result<BTreeMap<String, Vec<MatchResult>>> {
    let mut results = BTreeMap::new();
    if queries.is_empty() {
        return Ok(results);
    }
    if candidates.is_empty() {
        for query in queries {
            results.insert(query.id.clone(), Vec::new());
        }
        return Ok(results);
    }

    // The sparse backend derives its vocabulary from this exact union
    let union: Vec<String> = queries
        .iter()
        .chain(candidates.iter())
        .map(|doc| doc.text.clone())
        .collect();
    embedder.fit(&union)?;

    let candidate_texts: Vec<String> = candidates.iter().map(|doc| doc.text.clone()).collect();
    let vectors = embedder.embed_corpus(&candidate_texts)?;
    let index = SimilarityIndex::build(vectors)?;
    debug!(
        candidates = index.len(),
        dimension = index.dimension(),
        "Built similarity index"
    );

    let overlap_stops = if config.exclude_stopwords_in_overlap {
        Some(&config.stopwords)
    } else {
        None
    };

    for query in queries {
        let query_vector = embedder.embed_query(&query.text)?;
        let hits = index.search(&query_vector, config.top_k)?;

        let matches = hits
            .into_iter()
            .enumerate()
            .map(|(i, (position, score))| {
                let candidate = &candidates[position];
                MatchResult {
                    query_id: query.id.clone(),
                    candidate_id: candidate.id.clone(),
                    score,
                    rank: i + 1,
                    overlap_terms: overlap_terms(
                        &query.text,
                        &candidate.text,
                        config.overlap_limit,
                        overlap_stops,
                    ),
                }
            })
            .collect();
        results.insert(query.id.clone(), matches);
    }

    info!(
        queries = queries.len(),
        candidates = candidates.len(),
        strategy = %embedder.strategy(),
        top_k = config.top_k,
        "Ranked corpus"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::TfidfEmbedder;

    fn docs(pairs: &[(&str, &str)]) -> Vec<Document> {
        pairs.iter().map(|(id, text)| Document::new(*id, *text)).collect()
    }

    fn sparse_config() -> MatchConfig {
        MatchConfig {
            stopwords: HashSet::new(),
            ..MatchConfig::default()
        }
    }

    #[test]
    fn test_concrete_scenario() {
        let queries = docs(&[("job1", "data scientist python machine learning")]);
        let candidates = docs(&[
            ("alice", "python machine learning statistics"),
            ("bob", "human resources recruitment"),
        ]);
        let config = MatchConfig {
            top_k: 2,
            ..sparse_config()
        };

        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &queries, &candidates, &config).unwrap();

        let job1 = &results["job1"];
        assert_eq!(job1.len(), 2);
        assert_eq!(job1[0].candidate_id, "alice");
        assert_eq!(job1[0].rank, 1);
        assert_eq!(job1[1].candidate_id, "bob");
        assert_eq!(job1[1].rank, 2);
        assert!(job1[0].score > job1[1].score);

        for term in ["learning", "machine", "python"] {
            assert!(job1[0].overlap_terms.iter().any(|t| t == term));
        }
    }

    #[test]
    fn test_empty_candidate_corpus() {
        let queries = docs(&[("job1", "data scientist")]);
        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &queries, &[], &sparse_config()).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results["job1"].is_empty());
    }

    #[test]
    fn test_empty_query_set() {
        let candidates = docs(&[("alice", "python")]);
        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &[], &candidates, &sparse_config()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_result_length_law() {
        let queries = docs(&[("job1", "rust engineer")]);
        let candidates = docs(&[
            ("a", "rust developer"),
            ("b", "java developer"),
            ("c", "product manager"),
        ]);

        for top_k in [0, 1, 2, 3, 10] {
            let config = MatchConfig {
                top_k,
                ..sparse_config()
            };
            let mut embedder = TfidfEmbedder::new(HashSet::new());
            let results = rank(&mut embedder, &queries, &candidates, &config).unwrap();
            assert_eq!(results["job1"].len(), top_k.min(candidates.len()));
        }
    }

    #[test]
    fn test_top_k_zero_yields_empty() {
        let queries = docs(&[("job1", "rust")]);
        let candidates = docs(&[("a", "rust")]);
        let config = MatchConfig {
            top_k: 0,
            ..sparse_config()
        };
        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &queries, &candidates, &config).unwrap();
        assert!(results["job1"].is_empty());
    }

    #[test]
    fn test_no_duplicate_candidates_when_k_exceeds_corpus() {
        let queries = docs(&[("job1", "rust engineer")]);
        let candidates = docs(&[("a", "rust developer"), ("b", "java developer")]);
        let config = MatchConfig {
            top_k: 50,
            ..sparse_config()
        };
        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &queries, &candidates, &config).unwrap();

        let ids: HashSet<&str> = results["job1"].iter().map(|m| m.candidate_id.as_str()).collect();
        assert_eq!(ids.len(), results["job1"].len());
        assert_eq!(results["job1"].len(), 2);
    }

    #[test]
    fn test_empty_candidate_text_participates_and_loses() {
        let queries = docs(&[("job1", "python data")]);
        let candidates = docs(&[("empty", ""), ("alice", "python data science")]);
        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &queries, &candidates, &sparse_config()).unwrap();

        let job1 = &results["job1"];
        assert_eq!(job1.len(), 2);
        assert_eq!(job1[0].candidate_id, "alice");
        assert_eq!(job1[1].candidate_id, "empty");
        assert_eq!(job1[1].score, 0.0);
    }

    #[test]
    fn test_ranks_are_one_based_and_contiguous() {
        let queries = docs(&[("job1", "alpha beta gamma")]);
        let candidates = docs(&[("a", "alpha"), ("b", "alpha beta"), ("c", "gamma")]);
        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &queries, &candidates, &sparse_config()).unwrap();

        let ranks: Vec<usize> = results["job1"].iter().map(|m| m.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_multiple_queries() {
        let queries = docs(&[
            ("data_job", "python data statistics"),
            ("hr_job", "recruitment hiring people"),
        ]);
        let candidates = docs(&[
            ("alice", "python statistics modeling"),
            ("bob", "recruitment hiring onboarding"),
        ]);
        let mut embedder = TfidfEmbedder::new(HashSet::new());
        let results = rank(&mut embedder, &queries, &candidates, &sparse_config()).unwrap();

        assert_eq!(results["data_job"][0].candidate_id, "alice");
        assert_eq!(results["hr_job"][0].candidate_id, "bob");
    }
}
