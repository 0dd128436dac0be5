use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::jwt::TokenIssuer;
use crate::skills::catalog::SkillCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Read-only master skill list, built once at startup.
    pub catalog: Arc<SkillCatalog>,
    pub tokens: TokenIssuer,
}
