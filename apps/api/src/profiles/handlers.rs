use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AdminClaims;
use crate::errors::AppError;
use crate::profiles::models::{Profile, ProfileSubmission};
use crate::profiles::store::{self, Page, ProfileStats};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub id: i32,
}

/// POST /api/profile
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    payload: Result<Json<ProfileSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let Json(submission) = payload?;
    let hm_id = submission.validated_hm_id()?;

    let outcome = store::upsert_profile(&state.db, &state.catalog, &hm_id, submission).await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Profile submitted successfully")
    } else {
        (StatusCode::OK, "Profile updated successfully")
    };
    Ok((
        status,
        Json(SubmitResponse {
            message: message.to_string(),
            id: outcome.id,
        }),
    ))
}

/// GET /api/profile/:hm_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(hm_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let row = store::find_by_hm_id(&state.db, hm_id.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    if !row.approved {
        return Err(AppError::Forbidden(
            "Profile pending admin approval".to_string(),
        ));
    }
    Ok(Json(Profile::from_row(row, &state.catalog)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<Profile>,
    pub total: i64,
    pub pages: i64,
    pub page: i64,
}

/// GET /api/admin/profiles
pub async fn handle_list_profiles(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ProfileListResponse>, AppError> {
    let page = Page::new(params.page, params.per_page);
    let (rows, total) = store::list_profiles(&state.db, &params.search, page).await?;

    Ok(Json(ProfileListResponse {
        profiles: rows
            .into_iter()
            .map(|row| Profile::from_row(row, &state.catalog))
            .collect(),
        total,
        pages: page.page_count(total),
        page: page.page,
    }))
}

/// DELETE /api/admin/profiles/:id
pub async fn handle_delete_profile(
    admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !store::delete_profile(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Profile {id} not found")));
    }
    tracing::info!("Profile {id} deleted by {}", admin.subject());
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub message: String,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
}

/// PATCH /api/admin/profiles/:id/approval
pub async fn handle_set_approval(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<ApprovalRequest>, JsonRejection>,
) -> Result<Json<ApprovalResponse>, AppError> {
    let Json(req) = payload?;

    let change = store::set_approval(&state.db, id, req.approved)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;

    Ok(Json(ApprovalResponse {
        message: "Updated".to_string(),
        approved: change.state.is_approved(),
        approved_at: change.approved_at,
    }))
}

/// GET /api/admin/stats
pub async fn handle_stats(
    _admin: AdminClaims,
    State(state): State<AppState>,
) -> Result<Json<ProfileStats>, AppError> {
    Ok(Json(store::profile_stats(&state.db).await?))
}
