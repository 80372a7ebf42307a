//! Student Store
//!
//! The store-access collaborator the query interpreter runs against:
//!
//! - **types**: Fields, records, filters and pipeline stages
//! - **memory**: In-memory document collection evaluating filters and pipelines
//! - **csv_loader**: Student CSV import
//! - **error**: Error types
//!
//! # Contract
//!
//! ```text
//! find(filter, limit)   -> [StudentRecord]
//! aggregate(pipeline)   -> [{label, value}]
//! ```
//!
//! Stores are opened once at process start and shared by all requests.
//! Timeouts and retries belong to the store implementation; callers surface
//! any `StoreError` as a terminal failure.

pub mod csv_loader;
pub mod error;
pub mod memory;
pub mod types;

pub use csv_loader::{load_students_csv, parse_students_csv, CsvImportResult};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use types::{
    scalar_label, Condition, Field, FindFilter, LabelSource, LabeledValue, ScalarKey, Stage,
    StudentRecord,
};

use async_trait::async_trait;

/// Read access to the student collection
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &str;

    /// Fetch up to `limit` records satisfying the filter
    async fn find(&self, filter: &FindFilter, limit: usize) -> StoreResult<Vec<StudentRecord>>;

    /// Run an aggregation pipeline
    async fn aggregate(&self, pipeline: &[Stage]) -> StoreResult<Vec<LabeledValue>>;

    /// Number of records in the collection
    async fn count(&self) -> StoreResult<usize>;
}
