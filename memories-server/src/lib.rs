//! memories-server library
//!
//! HTTP layer of the memories gallery: access-code gate, spreadsheet and
//! media uploads, and the parsed memories feed.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use memories_common::api::auth::AccessGate;
use memories_ingest::IngestCache;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod storage;

pub use crate::error::{ApiError, ApiResult};
use crate::storage::FileStorage;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Local byte source for the memories file and media
    pub storage: Arc<FileStorage>,
    /// Parsed-memories cache keyed by file content
    pub cache: Arc<IngestCache>,
    /// Access-code gate for protected routes
    pub access: Arc<AccessGate>,
}

impl AppState {
    pub fn new(storage: FileStorage, cache: IngestCache, access: AccessGate) -> Self {
        Self {
            storage: Arc::new(storage),
            cache: Arc::new(cache),
            access: Arc::new(access),
        }
    }
}

/// Build application router
///
/// `/health` and `/api/auth/verify` are public; everything else requires
/// the access code.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    use axum::middleware;

    let protected = Router::new()
        .merge(api::memories_routes())
        .merge(api::media_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .merge(api::health_routes())
        .merge(api::auth_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
