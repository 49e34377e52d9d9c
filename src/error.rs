//! Error types for the matching engine

use crate::vector::Strategy;
use thiserror::Error;

/// Result type alias for matching operations
pub type Result<T> = std::result::Result<T, MatchError>;

/// Error types that can occur while building or searching a matching run
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Strategy mismatch: expected {expected}, got {actual}")]
    StrategyMismatch { expected: Strategy, actual: Strategy },

    #[error("Embedding error: {0}")]
    Embedding(String),
}
