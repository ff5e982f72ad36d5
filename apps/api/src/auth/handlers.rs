//! Axum route handlers for admin sign-in, sign-up and sign-out.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::extractor::AdminSession;
use crate::auth::password::{hash_password, verify_password_or_dummy, MIN_PASSWORD_LEN};
use crate::content::validation::{Checker, FieldError};
use crate::errors::AppError;
use crate::models::admin::{AdminIdentity, AdminUserRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin: AdminIdentity,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_sign_up(req: &SignUpRequest) -> Result<(), Vec<FieldError>> {
    let mut checker = Checker::new();
    checker.email("email", &req.email);
    let mut errors = match checker.finish() {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if req.password != req.confirm_password {
        errors.push(FieldError::new("confirm_password", "Passwords do not match"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/signin
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = normalize_email(&req.email);

    let user = sqlx::query_as::<_, AdminUserRow>(
        "SELECT id, email, password_hash FROM admin_users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;

    let verified = verify_password_or_dummy(
        user.as_ref().map(|u| u.password_hash.as_str()),
        &req.password,
    )?;
    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            warn!(admin_id = %user.id, "Sign-in attempt with wrong password");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!("Sign-in attempt for unknown admin");
            return Err(AppError::InvalidCredentials);
        }
    };

    let admin = AdminIdentity::from(&user);
    let issued = state
        .sessions
        .create(&admin, Duration::from_secs(state.config.session_ttl_secs))
        .await?;

    info!(admin_id = %admin.id, "Admin signed in");
    Ok(Json(SessionResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        admin,
    }))
}

/// POST /api/v1/auth/signup
///
/// Disabled unless `ADMIN_SIGNUP_ENABLED` is set.
pub async fn handle_sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AdminIdentity>), AppError> {
    if !state.config.admin_signup_enabled {
        return Err(AppError::Forbidden);
    }
    validate_sign_up(&req).map_err(AppError::InvalidInput)?;

    let admin = create_admin(&state.db, &normalize_email(&req.email), &req.password).await?;
    info!(admin_id = %admin.id, "Admin account created");
    Ok((StatusCode::CREATED, Json(admin)))
}

/// POST /api/v1/auth/signout
pub async fn handle_sign_out(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<StatusCode, AppError> {
    state.sessions.revoke(&session.token).await?;
    info!(admin_id = %session.identity.id, "Admin signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn handle_current_session(session: AdminSession) -> Json<AdminIdentity> {
    Json(session.identity)
}

/// Inserts an admin account. A duplicate email is a conflict.
pub async fn create_admin(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
) -> Result<AdminIdentity, AppError> {
    let password_hash = hash_password(password)?;

    let result = sqlx::query_as::<_, AdminUserRow>(
        "INSERT INTO admin_users (email, password_hash) VALUES ($1, $2) RETURNING id, email, password_hash",
    )
    .bind(email)
    .bind(&password_hash)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(AdminIdentity::from(&row)),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            "An admin with this email already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(email: &str, password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
    }

    #[test]
    fn test_sign_up_valid() {
        assert!(validate_sign_up(&sign_up("a@b.co", "longenough", "longenough")).is_ok());
    }

    #[test]
    fn test_sign_up_password_mismatch() {
        let errors = validate_sign_up(&sign_up("a@b.co", "longenough", "different1")).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("confirm_password", "Passwords do not match")]
        );
    }

    #[test]
    fn test_sign_up_short_password_and_bad_email() {
        let errors = validate_sign_up(&sign_up("nope", "short", "short")).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }
}
