mod auth;
mod config;
mod db;
mod errors;
mod export;
mod lenient;
mod models;
mod profiles;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::admins::ensure_default_admin;
use crate::auth::jwt::TokenIssuer;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::skills::catalog::SkillCatalog;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentDesk API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;
    ensure_default_admin(&db, &config.admin_username, &config.admin_password).await?;

    let catalog = match &config.skill_catalog_path {
        Some(path) => SkillCatalog::from_json_file(path)?,
        None => SkillCatalog::builtin(),
    };
    info!("Skill catalog loaded ({} entries)", catalog.len());

    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_hours)?;

    let state = AppState {
        db,
        catalog: Arc::new(catalog),
        tokens,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origin)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `*` allows any origin; anything else is a single exact origin.
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    if origin.trim() == "*" {
        return Ok(CorsLayer::permissive());
    }
    let origin = HeaderValue::from_str(origin.trim())
        .with_context(|| format!("CORS_ORIGIN is not a valid origin: {origin}"))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(Any)
        .allow_headers(Any))
}
