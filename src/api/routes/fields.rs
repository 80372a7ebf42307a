//! Field Routes
//!
//! - GET /api/fields - Vocabulary aliases in resolution order

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::FieldsResponse;
use crate::api::state::AppState;

/// GET /api/fields
pub async fn list_fields(State(state): State<Arc<AppState>>) -> Json<FieldsResponse> {
    let vocabulary = state.executor.interpreter().vocabulary();
    Json(FieldsResponse::from(vocabulary.as_ref()))
}
