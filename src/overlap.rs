//! Shared-vocabulary overlap between a query and a candidate document.
//!
//! Works on raw whitespace tokens rather than normalized text: the overlap
//! hint shows the reader words as they appear in both documents. Stop words
//! are included unless the caller passes an exclusion set.

use std::collections::{BTreeSet, HashSet};

/// Compute the terms shared by both texts, alphabetically sorted and capped
/// at `limit`.
///
/// Tokens are compared lowercase. When `stopwords` is `Some`, stop words are
/// removed from the intersection. An empty intersection yields an empty
/// list.
pub fn overlap_terms(
    query_text: &str,
    candidate_text: &str,
    limit: usize,
    stopwords: Option<&HashSet<String>>,
) -> Vec<String> {
    let query_words = word_set(query_text);
    let candidate_words = word_set(candidate_text);

    query_words
        .intersection(&candidate_words)
        .filter(|word| stopwords.map_or(true, |stops| !stops.contains(*word)))
        .take(limit)
        .cloned()
        .collect()
}

fn word_set(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}
