//! Text normalization for the sparse strategy and overlap explanation

use std::collections::HashSet;

/// The default English stop-word set.
pub fn english_stopwords() -> HashSet<String> {
    stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .collect()
}

/// Normalize raw text: lowercase, strip every character that is neither a
/// letter nor whitespace, drop stop-word tokens, rejoin with single spaces.
///
/// Pure and total: empty or all-noise input yields the empty string.
pub fn normalize(text: &str, stopwords: &HashSet<String>) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !stopwords.contains(*token))
        .collect::<Vec<_>>()
        .join(" ")
}
