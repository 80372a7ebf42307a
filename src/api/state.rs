//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::query::QueryExecutor;
use crate::store::StudentStore;

pub use crate::config::ApiConfig;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Query executor answering chart requests
    pub executor: Arc<QueryExecutor>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(executor: Arc<QueryExecutor>, config: ApiConfig) -> Self {
        Self {
            executor,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// The student store behind the executor
    pub fn store(&self) -> &Arc<dyn StudentStore> {
        self.executor.store()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
