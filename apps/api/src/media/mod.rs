//! Image uploads for profile pictures and project screenshots.
//!
//! Files go to the configured S3 bucket under `media/<uuid>.<ext>`; the
//! returned URL is what admins store in `profile_picture_url` / `image_url`.

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AdminSession;
use crate::errors::AppError;
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Request body cap for the upload route: the file plus multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadedMedia {
    pub key: String,
    pub url: String,
}

/// File extension for an accepted image content type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

pub fn media_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

fn check_upload(content_type: Option<&str>, size: usize) -> Result<&'static str, AppError> {
    let ext = content_type.and_then(extension_for).ok_or_else(|| {
        AppError::Validation("Only PNG, JPEG, WebP and GIF images are accepted".to_string())
    })?;
    if size == 0 {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation("Images must be 5 MiB or smaller".to_string()));
    }
    Ok(ext)
}

/// POST /api/v1/admin/media
///
/// Multipart body with a single `file` field.
pub async fn handle_upload(
    admin: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedMedia>), AppError> {
    let mut upload: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((content_type, data));
        break;
    }

    let (content_type, data) = upload
        .ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let ext = check_upload(content_type.as_deref(), data.len())?;
    let key = format!("media/{}.{ext}", Uuid::new_v4());
    let size = data.len();

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(data))
        .content_type(content_type.unwrap_or_default())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!(%key, size, admin_id = %admin.identity.id, "Uploaded media to s3://{}", state.config.s3_bucket);

    let url = media_url(&state.config.public_media_base_url, &key);
    Ok((StatusCode::CREATED, Json(UploadedMedia { key, url })))
}
