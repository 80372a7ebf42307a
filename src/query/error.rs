//! Query error types
//!
//! Defines all error conditions that can occur while interpreting and executing chart queries.

use thiserror::Error;

/// Errors that can occur during query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// Query text was empty or whitespace
    #[error("Query text is required")]
    EmptyQuery,

    /// The field vocabulary is malformed
    #[error("Invalid vocabulary: {0}")]
    Vocabulary(String),

    /// A phrase pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Store layer error
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
