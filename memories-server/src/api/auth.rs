//! Access-code middleware and verification endpoint
//!
//! Clients send the shared access code in the `x-access-code` header on
//! every protected request. With no code configured the middleware passes
//! everything through.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::post,
    Json, Router,
};
use memories_common::api::auth::ACCESS_CODE_HEADER;
use memories_common::api::types::{Message, Success};
use serde::Deserialize;
use tracing::warn;

use crate::{ApiResult, AppState};

/// Body of POST /api/auth/verify
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

/// Reject protected requests without a valid access code
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let provided = request
        .headers()
        .get(ACCESS_CODE_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(e) = state.access.verify(provided) {
        warn!(uri = %request.uri(), "Access denied: {}", e);
        return Err(e.into());
    }

    Ok(next.run(request).await)
}

/// POST /api/auth/verify
///
/// Lets the client check a code before storing it.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> ApiResult<Json<Success<Message>>> {
    state.access.verify(Some(&body.code))?;
    Ok(Json(Success::new(Message {
        message: "Access granted".to_string(),
    })))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/api/auth/verify", post(verify_code))
}
