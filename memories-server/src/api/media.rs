//! Media upload, listing, download and deletion
//!
//! Downloads are served by tower-http's `ServeFile`, which streams the file
//! and answers Range and conditional requests (needed for seeking in video
//! and audio).

use axum::{
    body::{Body, Bytes},
    extract::{Path, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use memories_common::api::types::{Message, Success};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::storage::content_type_for;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct UploadedFiles {
    pub message: String,
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MediaList {
    pub files: Vec<String>,
}

/// POST /api/upload/media/:filename
pub async fn upload_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Success<UploadedFiles>>> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }

    let storage = Arc::clone(&state.storage);
    let name = filename.clone();
    tokio::task::spawn_blocking(move || storage.save_media_file(&name, &body)).await??;

    Ok(Json(Success::new(UploadedFiles {
        message: "File uploaded successfully".to_string(),
        files: vec![filename],
    })))
}

/// GET /api/media
pub async fn list_media(State(state): State<AppState>) -> ApiResult<Json<Success<MediaList>>> {
    let storage = Arc::clone(&state.storage);
    let files = tokio::task::spawn_blocking(move || storage.list_media_files()).await??;

    Ok(Json(Success::new(MediaList { files })))
}

/// GET /api/media/:filename
pub async fn get_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> ApiResult<Response> {
    let path = state.storage.media_path(&filename)?;
    let is_file = tokio::fs::metadata(&path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let mut response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    if response.status().is_success() {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(&filename)),
        );
    }

    Ok(response.into_response())
}

/// DELETE /api/media/:filename
pub async fn delete_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<Success<Message>>> {
    let storage = Arc::clone(&state.storage);
    let deleted = tokio::task::spawn_blocking(move || storage.delete_media_file(&filename)).await??;

    if !deleted {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    Ok(Json(Success::new(Message {
        message: "File deleted successfully".to_string(),
    })))
}

pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload/media/:filename", post(upload_media))
        .route("/api/media", get(list_media))
        .route("/api/media/:filename", get(get_media).delete(delete_media))
}
