//! # Resume Matcher
//!
//! A resume-to-job matching engine.
//!
//! This library provides:
//! - Text normalization and stop-word handling
//! - Two interchangeable vectorization strategies (pretrained dense
//!   embeddings and per-run TF-IDF)
//! - Brute-force cosine-similarity search with deterministic top-k
//! - Keyword-overlap explanations for ranked results
//!
//! ## Example
//!
//! ```rust
//! use resume_matcher::{rank, Document, MatchConfig, TfidfEmbedder};
//!
//! let jobs = vec![Document::new("job1", "data scientist python machine learning")];
//! let resumes = vec![
//!     Document::new("alice", "python machine learning statistics"),
//!     Document::new("bob", "human resources recruitment"),
//! ];
//!
//! let mut embedder = TfidfEmbedder::with_default_stopwords();
//! let results = rank(&mut embedder, &jobs, &resumes, &MatchConfig::default()).unwrap();
//! assert_eq!(results["job1"][0].candidate_id, "alice");
//! ```

pub mod embed;
pub mod error;
pub mod index;
pub mod overlap;
pub mod ranker;
pub mod text;
pub mod vector;

pub use embed::{DenseEmbedder, Embedder, TfidfEmbedder};
pub use error::{MatchError, Result};
pub use index::SimilarityIndex;
pub use overlap::overlap_terms;
pub use ranker::{rank, Document, MatchConfig, MatchResult};
pub use text::{english_stopwords, normalize};
pub use vector::{Strategy, Vector};
