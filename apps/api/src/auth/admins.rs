use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::models::admin::AdminUserRow;

pub async fn find_by_username(pool: &PgPool, username: &str) -> sqlx::Result<Option<AdminUserRow>> {
    sqlx::query_as("SELECT * FROM admin_users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Creates the bootstrap admin account if it doesn't exist yet.
/// An existing account keeps its password.
pub async fn ensure_default_admin(pool: &PgPool, username: &str, password: &str) -> Result<()> {
    if find_by_username(pool, username).await?.is_some() {
        return Ok(());
    }

    let hash = hash_password(password)?;
    sqlx::query(
        "INSERT INTO admin_users (username, password_hash) VALUES ($1, $2) ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(&hash)
    .execute(pool)
    .await
    .context("Failed to create default admin user")?;

    info!("Default admin user '{username}' created");
    Ok(())
}
