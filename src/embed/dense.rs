//! Dense sentence-embedding strategy backed by fastembed.
//!
//! The underlying model (all-MiniLM-L6-v2, 384 dimensions) is expensive to
//! load, so it lives in process-wide state: loaded lazily on first use
//! behind a lock and reused by every subsequent matching run. Concurrent
//! callers serialize on the lock.

use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::embed::Embedder;
use crate::error::{MatchError, Result};
use crate::vector::{Strategy, Vector};

static MODEL: Mutex<Option<TextEmbedding>> = Mutex::new(None);

fn encode(texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
    let mut slot = MODEL
        .lock()
        .map_err(|_| MatchError::Embedding("embedding model lock poisoned".to_string()))?;

    if slot.is_none() {
        info!(model = "all-MiniLM-L6-v2", "Loading sentence-embedding model");
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| MatchError::Embedding(e.to_string()))?;
        *slot = Some(model);
    }

    let model = slot.as_mut().expect("model initialized above");
    model
        .embed(texts, None)
        .map_err(|e| MatchError::Embedding(e.to_string()))
}

/// Embeds raw (unnormalized) text with the shared sentence-embedding model.
///
/// Output vectors are scaled to unit length, so inner products are cosine
/// similarities.
#[derive(Debug, Default)]
pub struct DenseEmbedder;

impl DenseEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for DenseEmbedder {
    fn strategy(&self) -> Strategy {
        Strategy::DenseEmbedding
    }

    fn embed_corpus(&mut self, texts: &[String]) -> Result<Vec<Vector>> {
        // An empty batch must not trigger a model load
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = encode(texts.to_vec())?;
        Ok(embeddings
            .into_iter()
            .map(|data| Vector::new(data, Strategy::DenseEmbedding).normalized())
            .collect())
    }

    fn embed_query(&mut self, text: &str) -> Result<Vector> {
        let mut vectors = self.embed_corpus(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| MatchError::Embedding("model returned no embedding".to_string()))
    }
}
