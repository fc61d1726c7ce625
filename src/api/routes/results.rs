//! Result Routes
//!
//! - GET /api/v1/results - List published results (`?team_id=`)
//! - POST /api/v1/results - Publish a result
//! - PUT /api/v1/results/:id - Update a result
//! - DELETE /api/v1/results/:id - Delete a result
//! - GET /api/v1/results/export - Download the scoreboard as CSV

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use super::teams::require_team;
use super::{optional, required};
use crate::api::dto::{CreateResultRequest, ResultListResponse, TeamFilterParams, UpdateResultRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::model::{ResultEntry, Team};

/// GET /api/v1/results
pub async fn list_results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TeamFilterParams>,
) -> ApiResult<Json<ResultListResponse>> {
    let team_id = optional(params.team_id);
    let results = state.store.list_results(team_id.as_deref())?;

    Ok(Json(ResultListResponse {
        total: results.len(),
        results,
    }))
}

/// POST /api/v1/results
pub async fn create_result(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateResultRequest>,
) -> ApiResult<(StatusCode, Json<ResultEntry>)> {
    require_team(&state, req.team_id.trim())?;
    let round = required("round", &req.round, 50)?;
    validate_score(req.score)?;

    let mut entry = ResultEntry::new(req.team_id.trim(), round, req.score);
    entry.remarks = optional(req.remarks);

    state.store.insert_result(&entry)?;
    tracing::info!(result_id = %entry.id, team_id = %entry.team_id, round = %entry.round, "Published result");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/v1/results/:id
pub async fn update_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateResultRequest>,
) -> ApiResult<Json<ResultEntry>> {
    let mut entry = state
        .store
        .get_result(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Result with id {} not found", id)))?;

    if let Some(round) = &req.round {
        entry.round = required("round", round, 50)?;
    }
    if let Some(score) = req.score {
        validate_score(score)?;
        entry.score = score;
    }
    if req.remarks.is_some() {
        entry.remarks = optional(req.remarks);
    }

    state.store.update_result(&entry)?;
    Ok(Json(entry))
}

/// DELETE /api/v1/results/:id
pub async fn delete_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_result(&id)? {
        return Err(ApiError::NotFound(format!("Result with id {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/results/export
pub async fn export_results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TeamFilterParams>,
) -> ApiResult<Response> {
    let team_id = optional(params.team_id);
    let results = state.store.list_results(team_id.as_deref())?;
    let teams = state.store.list_teams()?;

    let body = format_csv(&results, &teams)?;
    let filename = format!("results_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

fn validate_score(score: f64) -> ApiResult<()> {
    if !score.is_finite() || score < 0.0 {
        return Err(ApiError::Validation(format!(
            "score must be a non-negative number, got {}",
            score
        )));
    }
    Ok(())
}

/// One row per result: round, team, score, remarks, published_at
pub(crate) fn format_csv(results: &[ResultEntry], teams: &[Team]) -> ApiResult<Vec<u8>> {
    let names: HashMap<&str, &str> = teams
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["round", "team", "score", "remarks", "published_at"])
        .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))?;

    for entry in results {
        let team = names
            .get(entry.team_id.as_str())
            .copied()
            .unwrap_or(entry.team_id.as_str());
        let published = Utc
            .timestamp_millis_opt(entry.published_at)
            .single()
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        let score = entry.score.to_string();

        writer
            .write_record([
                entry.round.as_str(),
                team,
                score.as_str(),
                entry.remarks.as_deref().unwrap_or(""),
                published.as_str(),
            ])
            .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))
}
