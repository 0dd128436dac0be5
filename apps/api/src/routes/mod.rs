pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::export::handlers as export;
use crate::profiles::handlers as profiles;
use crate::skills::handlers as skills;
use crate::state::AppState;

/// Profile pictures travel inline as base64, so bodies are allowed up to 2 MiB.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Employee-facing
        .route("/api/profile", post(profiles::handle_submit_profile))
        .route("/api/profile/:hm_id", get(profiles::handle_get_profile))
        .route("/api/skills", get(skills::handle_search_skills))
        // Admin
        .route("/api/admin/login", post(auth::handle_login))
        .route("/api/admin/profiles", get(profiles::handle_list_profiles))
        .route(
            "/api/admin/profiles/:id",
            delete(profiles::handle_delete_profile),
        )
        .route(
            "/api/admin/profiles/:id/approval",
            patch(profiles::handle_set_approval),
        )
        .route("/api/admin/stats", get(profiles::handle_stats))
        .route("/api/admin/export/csv", get(export::handle_export_csv))
        .route("/api/admin/export/excel", get(export::handle_export_excel))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
