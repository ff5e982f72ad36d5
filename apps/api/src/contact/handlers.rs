use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AdminSession;
use crate::contact::store;
use crate::content::validation::Validate;
use crate::errors::AppError;
use crate::models::contact::{ContactMessage, ContactMessageInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContactAccepted {
    pub id: Uuid,
}

/// POST /api/v1/contact
pub async fn handle_submit_message(
    State(state): State<AppState>,
    Json(input): Json<ContactMessageInput>,
) -> Result<(StatusCode, Json<ContactAccepted>), AppError> {
    input.validate().map_err(AppError::InvalidInput)?;
    let message = store::insert_message(&state.db, &input).await?;
    // The sender's address stays out of the logs.
    info!(id = %message.id, "Contact message received");
    Ok((StatusCode::CREATED, Json(ContactAccepted { id: message.id })))
}

/// GET /api/v1/admin/messages
pub async fn handle_list_messages(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    Ok(Json(store::list_messages(&state.db).await?))
}

/// DELETE /api/v1/admin/messages/:id
pub async fn handle_delete_message(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !store::delete_message(&state.db, id).await? {
        return Err(AppError::NotFound(format!("message {id} not found")));
    }
    info!(%id, admin_id = %admin.identity.id, "Deleted contact message");
    Ok(StatusCode::NO_CONTENT)
}
