//! # Learnify Charts
//!
//! Natural-language chart queries over a student performance dataset.
//! A free-text question such as "average GPA by GradeClass" or
//! "students with age more than 18" is interpreted into a filter or a
//! group-by average, run against the student store, and returned as a
//! uniform chart payload (`labels`, `values`, `data`).
//!
//! ## Modules
//!
//! - [`store`]: Student records, the store trait and the in-memory store
//! - [`query`]: Vocabulary, interpretation, execution and result shaping
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use learnify_charts::query::{QueryExecutor, QueryInterpreter};
//! use learnify_charts::store::{MemoryStore, StudentRecord};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new(vec![
//!         StudentRecord::new().field("StudentID", 1001).field("GPA", 3.4).field("GradeClass", 0.0),
//!         StudentRecord::new().field("StudentID", 1002).field("GPA", 2.1).field("GradeClass", 3.0),
//!     ]));
//!
//!     let executor = QueryExecutor::new(QueryInterpreter::standard()?, store);
//!     let chart = executor.execute("average GPA by GradeClass", None).await?;
//!
//!     println!("{:?} -> {:?}", chart.labels, chart.values);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod query;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    Field, LabeledValue, MemoryStore, StoreError, StoreResult, StudentRecord, StudentStore,
};

pub use query::{
    ChartPayload, QueryError, QueryExecutor, QueryIntent, QueryInterpreter, QueryLimits,
    Vocabulary,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, QueryConfig, StoreConfig};
