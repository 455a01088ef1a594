// crates/server/src/jobs/runner.rs
//! Central job runner that manages all background jobs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::{broadcast, oneshot};
use uuid::Uuid;

use jobwatch_types::JobSnapshot;

use super::state::JobState;
use super::types::{JobHandle, JobId};

/// Central job runner that manages all background jobs.
///
/// Thread-safe via `Arc` wrapping. Call `start_job` to spawn async work
/// with progress tracking; poll `get_job` for a status snapshot or
/// `subscribe` for push updates.
pub struct JobRunner {
    jobs: RwLock<HashMap<JobId, Arc<JobState>>>,
    global_tx: broadcast::Sender<JobSnapshot>,
}

impl JobRunner {
    /// Create a new job runner.
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(256);
        Self {
            jobs: RwLock::new(HashMap::new()),
            global_tx,
        }
    }

    /// Start a new background job.
    ///
    /// The closure `f` receives:
    /// - `Arc<JobState>` for reporting progress
    /// - `oneshot::Receiver<()>` for cancellation detection
    ///
    /// Returns a `JobHandle` that can be used to cancel the job.
    pub fn start_job<F, Fut>(&self, job_type: impl Into<String>, total: u64, f: F) -> JobHandle
    where
        F: FnOnce(Arc<JobState>, oneshot::Receiver<()>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        let id = Uuid::new_v4().to_string();
        let state = Arc::new(JobState::new(id.clone(), job_type.into(), total));

        match self.jobs.write() {
            Ok(mut jobs) => {
                jobs.insert(id.clone(), Arc::clone(&state));
            }
            Err(e) => tracing::error!("RwLock poisoned writing jobs map: {e}"),
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();

        // Forward job progress to the global channel.
        let global_tx = self.global_tx.clone();
        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            let mut rx = state_clone.subscribe();
            while let Ok(progress) = rx.recv().await {
                let _ = global_tx.send(progress);
            }
        });

        // Spawn the job itself.
        let state_for_task = Arc::clone(&state);
        tokio::spawn(async move {
            state_for_task.set_running();
            match f(Arc::clone(&state_for_task), cancel_rx).await {
                Ok(()) => state_for_task.complete(),
                Err(e) => {
                    tracing::warn!(job_id = state_for_task.id(), error = %e, "job failed");
                    state_for_task.fail(e);
                }
            }
        });

        JobHandle::new(id, cancel_tx)
    }

    /// Subscribe to all job progress updates (for SSE streaming).
    pub fn subscribe(&self) -> broadcast::Receiver<JobSnapshot> {
        self.global_tx.subscribe()
    }

    /// Get current status of a specific job.
    pub fn get_job(&self, id: &str) -> Option<JobSnapshot> {
        match self.jobs.read() {
            Ok(jobs) => jobs.get(id).map(|s| s.snapshot()),
            Err(e) => {
                tracing::error!("RwLock poisoned reading jobs map: {e}");
                None
            }
        }
    }

    /// Get all jobs that have not reached a terminal state.
    pub fn active_jobs(&self) -> Vec<JobSnapshot> {
        match self.jobs.read() {
            Ok(jobs) => jobs
                .values()
                .map(|s| s.snapshot())
                .filter(|p| !p.is_terminal())
                .collect(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading jobs: {e}");
                Vec::new()
            }
        }
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
