//! Store error types
//!
//! Defines all errors that can occur while reaching or querying the student store.

use thiserror::Error;

/// Errors that can occur in the store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The aggregation pipeline is not well-formed
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    /// CSV source could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
