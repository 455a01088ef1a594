// crates/server/src/routes/progress.rs
//! The polling contract: job status by id.
//!
//! - GET /progress/{job_id} — `200 JobSnapshot` | `404`

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use jobwatch_types::JobSnapshot;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/progress/{job_id} — status snapshot for one job.
async fn job_progress(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobSnapshot>> {
    state
        .jobs
        .get_job(&job_id)
        .map(Json)
        .ok_or(ApiError::JobNotFound(job_id))
}

/// Build the progress router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/progress/{job_id}", get(job_progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::CollectorSettings;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> (Arc<AppState>, Router) {
        let state = AppState::new(CollectorSettings::default(), None);
        let router = Router::new()
            .nest("/api", router())
            .with_state(Arc::clone(&state));
        (state, router)
    }

    #[tokio::test]
    async fn test_unknown_job_returns_404() {
        let (_state, app) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/progress/job-456")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_known_job_returns_snapshot() {
        let (state, app) = app();

        let handle = state.jobs.start_job("collect", 2, |job, _cancel| async move {
            job.record_item("a", true);
            job.record_item("b", true);
            Ok(())
        });
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/progress/{}", handle.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let snap: JobSnapshot = serde_json::from_slice(&body).unwrap();
        assert_eq!(snap.job_id, handle.id);
        assert_eq!(snap.current, 2);
        assert_eq!(snap.items_history.len(), 2);
    }
}
