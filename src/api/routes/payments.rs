//! Payment Routes
//!
//! - GET /api/v1/payments - List payment screenshots (`?team_id=`, `?status=`)
//! - POST /api/v1/payments - Upload a screenshot (multipart `team_id` + `image`)
//! - PUT /api/v1/payments/:id/status - Verify or reject a payment

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::optional;
use super::teams::require_team;
use crate::api::dto::{PaymentListParams, PaymentListResponse, PaymentStatusRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::api::UPLOAD_BODY_LIMIT;
use crate::mail::templates;
use crate::media::{UploadError, UPLOAD_FIELD};
use crate::model::{new_id, now_millis, PaymentScreenshot, PaymentStatus, UserRole};
use crate::store::UserFilter;

/// GET /api/v1/payments
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaymentListParams>,
) -> ApiResult<Json<PaymentListResponse>> {
    let status = params.status.as_deref().map(parse_status).transpose()?;
    let team_id = optional(params.team_id);

    let payments: Vec<_> = state
        .store
        .list_payments(team_id.as_deref())?
        .into_iter()
        .filter(|p| status.map_or(true, |s| p.status == s))
        .collect();

    Ok(Json(PaymentListResponse {
        total: payments.len(),
        payments,
    }))
}

/// POST /api/v1/payments
///
/// Upload rejections keep the uploader's own message.
pub async fn upload_payment(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<PaymentScreenshot>)> {
    let mut team_id: Option<String> = None;
    let mut image: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "team_id" {
            let text = field
                .text()
                .await
                .map_err(|e| multipart_error("Invalid team_id field", e))?;
            team_id = optional(Some(text));
        } else if name == UPLOAD_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Invalid image field", e))?;
            image = Some((file_name, data));
        } else {
            tracing::debug!(field = %name, "Ignoring unexpected multipart field");
        }
    }

    let team_id =
        team_id.ok_or_else(|| ApiError::Validation("team_id field is required".to_string()))?;
    require_team(&state, &team_id)?;
    let (file_name, data) = image.ok_or(UploadError::MissingFile)?;

    let stored = state.uploader.upload(file_name.as_deref(), &data).await?;

    let payment = PaymentScreenshot {
        id: new_id(),
        team_id,
        image_url: stored.url.clone(),
        public_id: stored.public_id.clone(),
        status: PaymentStatus::Pending,
        uploaded_at: now_millis(),
    };
    if let Err(e) = state.store.insert_payment(&payment) {
        state.uploader.discard(&stored).await;
        return Err(e.into());
    }
    tracing::info!(payment_id = %payment.id, team_id = %payment.team_id, "Payment screenshot uploaded");

    Ok((StatusCode::CREATED, Json(payment)))
}

/// PUT /api/v1/payments/:id/status
///
/// Verifying or rejecting notifies the team leader by email.
pub async fn set_payment_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PaymentStatusRequest>,
) -> ApiResult<Json<PaymentScreenshot>> {
    let status = parse_status(&req.status)?;
    let payment = state.store.set_payment_status(&id, status)?;

    if status != PaymentStatus::Pending {
        notify_leader(&state, &payment);
    }

    Ok(Json(payment))
}

fn notify_leader(state: &AppState, payment: &PaymentScreenshot) {
    let team = match state.store.get_team(&payment.team_id) {
        Ok(Some(team)) => team,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(team_id = %payment.team_id, error = %e, "Could not load team for notification");
            return;
        }
    };

    let filter = UserFilter {
        role: Some(UserRole::TeamLeader),
        team_id: Some(team.id.clone()),
    };
    match state.store.list_users(&filter) {
        Ok(leaders) => {
            let verified = payment.status == PaymentStatus::Verified;
            for leader in leaders {
                state
                    .mailer
                    .dispatch(templates::payment_reviewed(&leader.email, &team.name, verified));
            }
        }
        Err(e) => {
            tracing::warn!(team_id = %team.id, error = %e, "Could not load team leader for notification");
        }
    }
}

/// Body-limit hits surface as an oversized upload, everything else as a bad form
fn multipart_error(context: &str, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::BodyTooLarge {
            limit: UPLOAD_BODY_LIMIT,
        }
        .into();
    }
    ApiError::Validation(format!("{}: {}", context, err))
}

fn parse_status(s: &str) -> ApiResult<PaymentStatus> {
    PaymentStatus::parse(s).ok_or_else(|| {
        ApiError::Validation(format!(
            "Invalid payment status: {}. Must be one of: pending, verified, rejected",
            s
        ))
    })
}
