//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! The chart response itself is [`crate::query::ChartPayload`].

use serde::{Deserialize, Serialize};

use crate::query::Vocabulary;
use crate::store::Field;

/// POST /api/generate-chart body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartRequest {
    /// Free-text question; a missing value is treated as empty
    #[serde(default)]
    pub query: String,
    /// Maximum rows or groups; absent or 0 uses the mode default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ChartRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
        }
    }
}

/// One vocabulary entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldAlias {
    pub alias: String,
    pub field: Field,
}

/// GET /api/fields response, in resolution order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldsResponse {
    pub fields: Vec<FieldAlias>,
    pub count: usize,
}

impl From<&Vocabulary> for FieldsResponse {
    fn from(vocabulary: &Vocabulary) -> Self {
        let fields: Vec<FieldAlias> = vocabulary
            .entries()
            .iter()
            .map(|entry| FieldAlias {
                alias: entry.alias.to_string(),
                field: entry.field,
            })
            .collect();

        Self {
            count: fields.len(),
            fields,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Store status: "ok" or "error"
    pub store: String,
    /// Number of student records, when the store answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Service version
    pub version: String,
}
