// crates/server/src/routes/collect.rs
//! Job initiation endpoint.
//!
//! - POST /collect — start a batch collection job, returns the job id

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use jobwatch_types::StartedJob;

use crate::collect::{run_collection, CollectRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/collect — start a collection job.
///
/// The response names the job under both `job_id` and `task_id`, since
/// clients in the wild look for either key.
async fn start_collection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CollectRequest>,
) -> ApiResult<Json<StartedJob>> {
    if req.source.trim().is_empty() {
        return Err(ApiError::BadRequest("source must not be empty".to_string()));
    }

    let items = req.item_names();
    if items.is_empty() {
        return Err(ApiError::BadRequest("no items to collect".to_string()));
    }

    let description = format!("batch collection from {}", req.source);
    let item_delay = state.collector.item_delay;
    let total = items.len() as u64;

    let handle = state
        .jobs
        .start_job(req.source.clone(), total, move |job, cancel_rx| async move {
            run_collection(job, cancel_rx, description, items, item_delay).await
        });

    tracing::info!(job_id = %handle.id, source = %req.source, total, "collection job started");

    Ok(Json(StartedJob {
        job_id: Some(handle.id.clone()),
        task_id: Some(handle.id),
    }))
}

/// Build the collect router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/collect", post(start_collection))
}
