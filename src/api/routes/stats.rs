//! Stats Route
//!
//! - GET /api/v1/stats - Counts for the admin overview

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::store::StoreStats;

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<StoreStats>> {
    Ok(Json(state.store.stats()?))
}
