use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use tracing::info;

use crate::content::snapshot::load_snapshot;
use crate::errors::AppError;
use crate::layout::paginate;
use crate::resume::document::layout_resume;
use crate::resume::html::render_html;
use crate::resume::pdf::render_pdf;
use crate::state::AppState;

/// `<name with whitespace runs replaced by "_">_Resume.pdf`.
pub fn resume_file_name(name: Option<&str>) -> String {
    let base = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| n.split_whitespace().collect::<Vec<_>>().join("_"))
        .unwrap_or_else(|| "Resume".to_string());
    format!("{base}_Resume.pdf")
}

/// Keeps the `Content-Disposition` header a valid quoted string.
fn header_safe(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect()
}

/// GET /api/v1/resume.html
pub async fn handle_resume_html(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = load_snapshot(&state.db).await?;
    Ok(Html(render_html(&snapshot).into_string()))
}

/// GET /api/v1/resume.pdf
pub async fn handle_resume_pdf(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load_snapshot(&state.db).await?;
    let name = snapshot.personal_info.as_ref().map(|i| i.name.clone());
    let file_name = header_safe(&resume_file_name(name.as_deref()));
    let title = name.unwrap_or_else(|| "Resume".to_string());
    let config = state.page_config.clone();

    // Layout and PDF serialization are CPU-bound.
    let (bytes, page_count) = tokio::task::spawn_blocking(move || {
        let column = layout_resume(&snapshot, &config);
        let pages = paginate(&column, &config);
        (render_pdf(&pages, &config, &title), pages.len())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("resume rendering task failed: {e}")))?;

    info!(pages = page_count, bytes = bytes.len(), "Rendered resume PDF");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
