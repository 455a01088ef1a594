// crates/server/src/routes/mod.rs
//! HTTP route registration.

pub mod collect;
pub mod health;
pub mod jobs;
pub mod progress;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::auth::require_bearer;
use crate::state::AppState;

/// Assemble every API route under `/api`, gated by the optional bearer
/// check.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", progress::router())
        .nest("/api", collect::router())
        .nest("/api", jobs::router())
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::CollectorSettings;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_api_routes_creation() {
        let state = AppState::new(CollectorSettings::default(), None);
        let _router = api_routes(state);
    }

    #[tokio::test]
    async fn test_bearer_gate_rejects_missing_token() {
        let state = AppState::new(CollectorSettings::default(), Some("sekret".to_string()));
        let app = api_routes(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer_gate_accepts_token() {
        let state = AppState::new(CollectorSettings::default(), Some("sekret".to_string()));
        let app = api_routes(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header(header::AUTHORIZATION, "Bearer sekret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_no_token_configured_is_open() {
        let state = AppState::new(CollectorSettings::default(), None);
        let app = api_routes(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
