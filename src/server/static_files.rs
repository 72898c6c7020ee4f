//! Static frontend: `index.html` and recipe images

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::path::Path as FsPath;
use tracing::debug;

use super::error::ApiError;
use super::AppState;

/// Content type for an image file, by extension
pub fn image_content_type(file_name: &str) -> &'static str {
    let extension = FsPath::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// GET / and GET /index.html
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = state.static_dir.join("index.html");
    let html = tokio::fs::read(&path).await.map_err(|e| {
        debug!(path = %path.display(), error = %e, "index.html unavailable");
        ApiError::NotFound("Not Found".to_string())
    })?;
    Ok(([(header::CONTENT_TYPE, "text/html")], html).into_response())
}

/// GET /images/{file}
///
/// Only the final path component is used, so the lookup never leaves the
/// images directory.
pub async fn image(
    State(state): State<AppState>,
    Path(requested): Path<String>,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::NotFound("Image not found".to_string());

    let file_name = FsPath::new(&requested)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(not_found)?;

    let path = state.static_dir.join("images").join(file_name);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        debug!(path = %path.display(), error = %e, "Image unavailable");
        not_found()
    })?;

    Ok(([(header::CONTENT_TYPE, image_content_type(file_name))], bytes).into_response())
}
