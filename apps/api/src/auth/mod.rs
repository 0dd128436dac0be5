pub mod admins;
pub mod handlers;
pub mod jwt;
pub mod password;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::jwt::Claims;
use crate::errors::AppError;
use crate::state::AppState;

/// Extractor guarding admin routes. Rejects with 401 unless the request carries
/// a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AdminClaims(pub Claims);

impl AdminClaims {
    pub fn subject(&self) -> &str {
        &self.0.sub
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

        if token.is_empty() {
            return Err(AppError::Unauthorized("Token missing".to_string()));
        }

        state
            .tokens
            .verify(token)
            .map(AdminClaims)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }
}
