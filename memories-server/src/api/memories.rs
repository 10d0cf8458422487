//! Memories feed and spreadsheet upload
//!
//! The uploaded file is parsed on every fetch, through the content-hash
//! cache. Parsing and file access run on the blocking pool.

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use memories_common::api::types::Success;
use memories_ingest::{ingest_with_report, IngestReport, Memory, RowWarning};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Original filename; its extension selects the decoder
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub count: usize,
    pub warnings: usize,
}

#[derive(Serialize)]
struct MemoriesPayload<'a> {
    memories: &'a [Memory],
}

#[derive(Serialize)]
struct WarningsPayload<'a> {
    warnings: &'a [RowWarning],
}

/// Parse the current memories file, or `None` when nothing was uploaded
async fn current_report(state: &AppState) -> ApiResult<Option<Arc<IngestReport>>> {
    let storage = Arc::clone(&state.storage);
    let cache = Arc::clone(&state.cache);

    tokio::task::spawn_blocking(move || -> ApiResult<_> {
        let Some((bytes, filename)) = storage.memories_file()? else {
            return Ok(None);
        };
        Ok(Some(cache.get_or_ingest(&bytes, &filename)?))
    })
    .await?
}

/// GET /api/memories
pub async fn list_memories(State(state): State<AppState>) -> ApiResult<Response> {
    let report = current_report(&state).await?;
    let memories = report.as_deref().map(|r| r.memories.as_slice()).unwrap_or(&[]);

    Ok(Json(Success::new(MemoriesPayload { memories })).into_response())
}

/// GET /api/memories/warnings
///
/// Field-level data-quality notes for the current file (defaulted
/// coordinates, dates kept as text).
pub async fn list_warnings(State(state): State<AppState>) -> ApiResult<Response> {
    let report = current_report(&state).await?;
    let warnings = report.as_deref().map(|r| r.warnings.as_slice()).unwrap_or(&[]);

    Ok(Json(Success::new(WarningsPayload { warnings })).into_response())
}

/// POST /api/upload/memories?filename=<name>
///
/// The body is the raw file. It is parsed before anything is written, so an
/// unsupported or unreadable file leaves the current one in place.
pub async fn upload_memories(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<Success<UploadResponse>>> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    }

    let storage = Arc::clone(&state.storage);
    let cache = Arc::clone(&state.cache);
    let filename = query.filename;

    let report = tokio::task::spawn_blocking(move || -> ApiResult<IngestReport> {
        let report = ingest_with_report(&body, &filename)?;
        storage.save_memories_file(&body, &filename)?;
        cache.invalidate();
        Ok(report)
    })
    .await??;

    info!(
        count = report.memories.len(),
        warnings = report.warnings.len(),
        "Memories file uploaded"
    );

    Ok(Json(Success::new(UploadResponse {
        message: "Memories file uploaded successfully".to_string(),
        count: report.memories.len(),
        warnings: report.warnings.len(),
    })))
}

pub fn memories_routes() -> Router<AppState> {
    Router::new()
        .route("/api/memories", get(list_memories))
        .route("/api/memories/warnings", get(list_warnings))
        .route("/api/upload/memories", post(upload_memories))
}
