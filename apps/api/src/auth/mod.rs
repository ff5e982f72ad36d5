// Admin authentication: argon2 credential check, Redis-backed bearer sessions,
// and the extractor that guards every /api/v1/admin route.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod sessions;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::BootstrapAdmin;

/// Creates the configured admin account when no admin exists yet.
pub async fn ensure_bootstrap_admin(pool: &PgPool, bootstrap: &BootstrapAdmin) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
        .fetch_one(pool)
        .await
        .context("failed to count admin accounts")?;

    if existing > 0 {
        info!("Admin accounts present; skipping bootstrap admin");
        return Ok(());
    }

    let email = handlers::normalize_email(&bootstrap.email);
    let admin = handlers::create_admin(pool, &email, &bootstrap.password)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create bootstrap admin: {e}"))?;
    info!(admin_id = %admin.id, "Bootstrap admin created");
    Ok(())
}
