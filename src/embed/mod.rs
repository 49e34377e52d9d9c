//! Vectorization strategies for turning document text into vectors.
//!
//! The two backends produce vectors in unrelated feature spaces; a matching
//! run picks exactly one embedder up front and uses it for both queries and
//! candidates.

pub mod dense;
pub mod tfidf;

pub use dense::DenseEmbedder;
pub use tfidf::TfidfEmbedder;

use crate::error::Result;
use crate::vector::{Strategy, Vector};

/// A vectorization backend shared by queries and candidates.
pub trait Embedder {
    /// The strategy tag stamped on every vector this embedder produces.
    fn strategy(&self) -> Strategy;

    /// Prepare per-run state from the union of query and candidate texts.
    ///
    /// The sparse backend derives its vocabulary from exactly this batch;
    /// the dense backend has nothing to fit.
    fn fit(&mut self, texts: &[String]) -> Result<()> {
        let _ = texts;
        Ok(())
    }

    /// Embed a batch of candidate texts, one vector per text, in order.
    fn embed_corpus(&mut self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Embed a single query text.
    fn embed_query(&mut self, text: &str) -> Result<Vector>;
}
