//! Axum route handlers for the public content API and the admin CRUD API.
//!
//! Handlers are generic over [`Collection`] / [`Singleton`]; the router
//! instantiates them once per table.

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AdminSession;
use crate::content::repository::{self, Collection, Singleton};
use crate::content::snapshot::{load_snapshot, PortfolioSnapshot};
use crate::content::validation::Validate;
use crate::errors::AppError;
use crate::models::content::SocialLink;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub is_active: bool,
}

fn check_reorder(ids: &[Uuid]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation("ids cannot be empty".to_string()));
    }
    let unique: HashSet<_> = ids.iter().collect();
    if unique.len() != ids.len() {
        return Err(AppError::Validation("ids must not repeat".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Public
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/portfolio
pub async fn handle_portfolio(
    State(state): State<AppState>,
) -> Result<Json<PortfolioSnapshot>, AppError> {
    Ok(Json(load_snapshot(&state.db).await?))
}

/// GET /api/v1/{table}
pub async fn handle_list_public<T: Collection>(
    State(state): State<AppState>,
) -> Result<Json<Vec<T>>, AppError> {
    Ok(Json(repository::list::<T>(&state.db, true).await?))
}

/// GET /api/v1/{personal_info|about_info}
pub async fn handle_get_singleton<T: Singleton>(
    State(state): State<AppState>,
) -> Result<Json<Option<T>>, AppError> {
    Ok(Json(repository::first::<T>(&state.db).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Admin
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/{table}
///
/// Unlike the public listing, includes inactive rows.
pub async fn handle_list_admin<T: Collection>(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<T>>, AppError> {
    Ok(Json(repository::list::<T>(&state.db, false).await?))
}

/// POST /api/v1/admin/{table}
pub async fn handle_create<T: Collection>(
    admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<T::Input>,
) -> Result<(StatusCode, Json<T>), AppError> {
    input.validate().map_err(AppError::InvalidInput)?;
    let row = repository::create::<T>(&state.db, &input).await?;
    info!(table = %T::TABLE, admin_id = %admin.identity.id, "Created row");
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/admin/{table}/:id
pub async fn handle_update<T: Collection>(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<T::Input>,
) -> Result<Json<T>, AppError> {
    input.validate().map_err(AppError::InvalidInput)?;
    let row = T::update(&state.db, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} row {id} not found", T::TABLE)))?;
    info!(table = %T::TABLE, %id, admin_id = %admin.identity.id, "Updated row");
    Ok(Json(row))
}

/// DELETE /api/v1/admin/{table}/:id
pub async fn handle_delete<T: Collection>(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repository::delete(&state.db, T::TABLE, id).await? {
        return Err(AppError::NotFound(format!("{} row {id} not found", T::TABLE)));
    }
    info!(table = %T::TABLE, %id, admin_id = %admin.identity.id, "Deleted row");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/{table}/reorder
///
/// Body lists ids in display order. All-or-nothing.
pub async fn handle_reorder<T: Collection>(
    admin: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<T>>, AppError> {
    check_reorder(&req.ids)?;
    if let Some(missing) = repository::reorder(&state.db, T::TABLE, &req.ids).await? {
        return Err(AppError::NotFound(format!(
            "{} row {missing} not found",
            T::TABLE
        )));
    }
    info!(table = %T::TABLE, count = req.ids.len(), admin_id = %admin.identity.id, "Reordered rows");
    Ok(Json(repository::list::<T>(&state.db, false).await?))
}

/// PATCH /api/v1/admin/social_links/:id/active
pub async fn handle_set_social_link_active(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActiveRequest>,
) -> Result<Json<SocialLink>, AppError> {
    let link = repository::set_social_link_active(&state.db, id, req.is_active)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("social_links row {id} not found")))?;
    info!(%id, is_active = req.is_active, admin_id = %admin.identity.id, "Toggled social link");
    Ok(Json(link))
}

/// PUT /api/v1/admin/{personal_info|about_info}
pub async fn handle_upsert_singleton<T: Singleton>(
    admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<T::Input>,
) -> Result<Json<T>, AppError> {
    input.validate().map_err(AppError::InvalidInput)?;
    let row = repository::upsert::<T>(&state.db, &input).await?;
    info!(table = %T::TABLE, admin_id = %admin.identity.id, "Saved singleton");
    Ok(Json(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_rejects_empty() {
        assert!(matches!(check_reorder(&[]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_reorder_rejects_duplicates() {
        let id = Uuid::new_v4();
        assert!(matches!(
            check_reorder(&[id, Uuid::new_v4(), id]),
            Err(AppError::Validation(msg)) if msg.contains("repeat")
        ));
    }

    #[test]
    fn test_reorder_accepts_distinct_ids() {
        assert!(check_reorder(&[Uuid::new_v4(), Uuid::new_v4()]).is_ok());
    }
}
