//! TF-IDF vectorizer fitted per matching run.
//!
//! The vocabulary and document frequencies come from the union of query and
//! candidate texts of a single run — `fit` replaces all state, nothing
//! survives across runs. A shared global vocabulary would skew scores toward
//! whichever corpus was fitted first, so refitting is part of the contract.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::embed::Embedder;
use crate::error::Result;
use crate::text::{english_stopwords, normalize};
use crate::vector::{Strategy, Vector};

/// Sparse term-weighting vectorizer.
///
/// Vocabulary columns are assigned in sorted term order and IDF uses the
/// smoothed form `ln((1 + n) / (1 + df)) + 1`, so output is bit-for-bit
/// reproducible for identical input batches.
pub struct TfidfEmbedder {
    stopwords: HashSet<String>,
    /// term -> column, assigned in sorted term order at fit time
    vocabulary: BTreeMap<String, usize>,
    /// per-column inverse document frequency
    idf: Vec<f32>,
    /// raw text -> normalized text, populated at fit time
    normalized: HashMap<String, String>,
}

impl TfidfEmbedder {
    /// Create an unfitted vectorizer with the given stop-word set.
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self {
            stopwords,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
            normalized: HashMap::new(),
        }
    }

    /// Create an unfitted vectorizer with the default English stop words.
    pub fn with_default_stopwords() -> Self {
        Self::new(english_stopwords())
    }

    /// Number of terms in the fitted vocabulary (0 before `fit`).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn normalized_of(&self, text: &str) -> String {
        match self.normalized.get(text) {
            Some(cached) => cached.clone(),
            None => normalize(text, &self.stopwords),
        }
    }

    fn transform(&self, text: &str) -> Vector {
        let normalized = self.normalized_of(text);
        let mut data = vec![0.0f32; self.vocabulary.len()];
        for token in normalized.split_whitespace() {
            if let Some(&column) = self.vocabulary.get(token) {
                data[column] += 1.0;
            }
        }
        for (column, weight) in data.iter_mut().enumerate() {
            *weight *= self.idf[column];
        }
        Vector::new(data, Strategy::SparseTfidf).normalized()
    }
}

impl Embedder for TfidfEmbedder {
    fn strategy(&self) -> Strategy {
        Strategy::SparseTfidf
    }

    fn fit(&mut self, texts: &[String]) -> Result<()> {
        self.vocabulary.clear();
        self.idf.clear();
        self.normalized.clear();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            let normalized = normalize(text, &self.stopwords);
            let unique: BTreeSet<&str> = normalized.split_whitespace().collect();
            for term in unique {
                *document_frequency.entry(term.to_string()).or_insert(0) += 1;
            }
            self.normalized.insert(text.clone(), normalized);
        }

        let n = texts.len() as f32;
        self.idf.reserve(document_frequency.len());
        for (column, (term, df)) in document_frequency.into_iter().enumerate() {
            self.vocabulary.insert(term, column);
            self.idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }

        debug!(
            documents = texts.len(),
            vocabulary = self.vocabulary.len(),
            "Fitted TF-IDF vocabulary"
        );
        Ok(())
    }

    fn embed_corpus(&mut self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|text| self.transform(text)).collect())
    }

    fn embed_query(&mut self, text: &str) -> Result<Vector> {
        Ok(self.transform(text))
    }
}
