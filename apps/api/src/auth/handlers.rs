use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::admins::find_by_username;
use crate::auth::password::verify_password;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

/// POST /api/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;

    let admin = find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let matches = verify_password(&req.password, &admin.password_hash).unwrap_or_else(|e| {
        warn!("Stored hash for admin '{}' is unreadable: {e}", admin.username);
        false
    });
    if !matches {
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(&admin.username)?;
    info!("Admin '{}' logged in", admin.username);
    Ok(Json(LoginResponse { token }))
}
