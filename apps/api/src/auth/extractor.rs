use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::errors::AppError;
use crate::models::admin::AdminIdentity;
use crate::state::AppState;

/// An authenticated admin, resolved from `Authorization: Bearer <token>`.
///
/// Adding this extractor to a handler is what makes the route admin-only.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub identity: AdminIdentity,
    pub token: String,
}

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?.to_string();
        let identity = state
            .sessions
            .lookup(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AdminSession { identity, token })
    }
}
