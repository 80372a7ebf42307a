//! Chart Routes
//!
//! Endpoint answering free-text questions with chart payloads.
//!
//! - POST /api/generate-chart - Interpret and run a query

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::ChartRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::query::ChartPayload;

/// POST /api/generate-chart
///
/// Empty results come back as `ok: false` payloads with status 200.
/// Malformed bodies and empty queries are 400, store faults 500.
pub async fn generate_chart(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChartRequest>, JsonRejection>,
) -> ApiResult<Json<ChartPayload>> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    let payload = state.executor.execute(&req.query, req.limit).await?;
    Ok(Json(payload))
}
