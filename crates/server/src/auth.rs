// crates/server/src/auth.rs
//! Optional bearer-token gate for the whole API surface.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::AppState;

/// Reject requests lacking the configured bearer token.
///
/// When the server has no token configured this is a pass-through.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(expected) = &state.auth_token {
        let presented = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let required = format!("Bearer {expected}");
        if presented != Some(required.as_str()) {
            return ApiError::Unauthorized.into_response();
        }
    }
    next.run(req).await
}
