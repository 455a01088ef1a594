// crates/server/src/lib.rs
//! jobwatch reference job server.
//!
//! An Axum HTTP server exposing the job-progress polling contract:
//! initiation (`POST /api/collect`), status polling
//! (`GET /api/progress/{job_id}`), active-job listing, and an SSE progress
//! stream. Jobs run on the in-process [`jobs::JobRunner`].

pub mod auth;
pub mod collect;
pub mod error;
pub mod jobs;
pub mod routes;
pub mod state;

pub use collect::CollectorSettings;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// Sets up the API routes, permissive CORS for development clients, and
/// request tracing.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_routes(state).layer(cors).layer(TraceLayer::new_for_http())
}
