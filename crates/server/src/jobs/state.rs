// crates/server/src/jobs/state.rs
//! Shared state tracking for a single background job.
//!
//! Counters use lock-free atomics so worker tasks can report progress
//! without blocking readers; the item history and text fields sit behind
//! `RwLock`s. `items_history` is strictly append-only, which is what lets
//! polling clients accumulate it idempotently.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use tokio::sync::broadcast;

use jobwatch_types::{JobItemRecord, JobPhase, JobSnapshot};

use super::types::JobId;

fn phase_from_u8(v: u8) -> JobPhase {
    match v {
        0 => JobPhase::Pending,
        1 => JobPhase::Running,
        2 => JobPhase::Completed,
        _ => JobPhase::Failed,
    }
}

fn phase_to_u8(phase: JobPhase) -> u8 {
    match phase {
        JobPhase::Pending => 0,
        JobPhase::Running => 1,
        JobPhase::Completed => 2,
        JobPhase::Failed => 3,
    }
}

/// State for a single job.
pub struct JobState {
    id: JobId,
    job_type: String,
    status: AtomicU8,
    current: AtomicU64,
    total: AtomicU64,
    success: AtomicU64,
    failed: AtomicU64,
    description: RwLock<Option<String>>,
    current_item: RwLock<Option<String>>,
    error: RwLock<Option<String>>,
    history: RwLock<Vec<JobItemRecord>>,
    progress_tx: broadcast::Sender<JobSnapshot>,
}

impl JobState {
    /// Create a new job state in the `Pending` phase.
    pub fn new(id: JobId, job_type: String, total: u64) -> Self {
        let (progress_tx, _) = broadcast::channel(64);
        Self {
            id,
            job_type,
            status: AtomicU8::new(phase_to_u8(JobPhase::Pending)),
            current: AtomicU64::new(0),
            total: AtomicU64::new(total),
            success: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            description: RwLock::new(None),
            current_item: RwLock::new(None),
            error: RwLock::new(None),
            history: RwLock::new(Vec::new()),
            progress_tx,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    /// Transition the job to `Running`.
    pub fn set_running(&self) {
        self.status
            .store(phase_to_u8(JobPhase::Running), Ordering::Relaxed);
        self.broadcast_progress();
    }

    /// Set the human-readable description and broadcast.
    pub fn set_description(&self, description: impl Into<String>) {
        match self.description.write() {
            Ok(mut guard) => *guard = Some(description.into()),
            Err(e) => tracing::error!("RwLock poisoned writing description: {e}"),
        }
        self.broadcast_progress();
    }

    /// Record the outcome of one work unit: appends a history record, bumps
    /// the progress counter and the matching tally, and remembers the item
    /// as the one most recently worked on.
    pub fn record_item(&self, item: impl Into<String>, success: bool) {
        let item = item.into();

        match self.history.write() {
            Ok(mut history) => {
                let index = history.len() as u64;
                history.push(JobItemRecord {
                    index,
                    timestamp: Utc::now(),
                    item: item.clone(),
                    success,
                });
            }
            Err(e) => tracing::error!("RwLock poisoned writing history: {e}"),
        }

        self.current.fetch_add(1, Ordering::Relaxed);
        if success {
            self.success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }

        match self.current_item.write() {
            Ok(mut guard) => *guard = Some(item),
            Err(e) => tracing::error!("RwLock poisoned writing current item: {e}"),
        }

        self.broadcast_progress();
    }

    /// Mark the job as completed. Terminal: no further transitions occur.
    pub fn complete(&self) {
        self.status
            .store(phase_to_u8(JobPhase::Completed), Ordering::Relaxed);
        self.broadcast_progress();
    }

    /// Mark the job as failed with an error message. Terminal.
    pub fn fail(&self, error: impl Into<String>) {
        self.status
            .store(phase_to_u8(JobPhase::Failed), Ordering::Relaxed);
        match self.error.write() {
            Ok(mut guard) => *guard = Some(error.into()),
            Err(e) => tracing::error!("RwLock poisoned writing error message: {e}"),
        }
        self.broadcast_progress();
    }

    /// Subscribe to progress updates for this specific job.
    pub fn subscribe(&self) -> broadcast::Receiver<JobSnapshot> {
        self.progress_tx.subscribe()
    }

    /// Get a snapshot of the current job state.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.id.clone(),
            status: phase_from_u8(self.status.load(Ordering::Relaxed)),
            current: self.current.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
            description: self.read_text(&self.description, "description"),
            current_item: self.read_text(&self.current_item, "current item"),
            success_count: self.success.load(Ordering::Relaxed),
            failed_count: self.failed.load(Ordering::Relaxed),
            error_message: self.read_text(&self.error, "error message"),
            items_history: match self.history.read() {
                Ok(guard) => guard.clone(),
                Err(e) => {
                    tracing::error!("RwLock poisoned reading history: {e}");
                    Vec::new()
                }
            },
        }
    }

    fn read_text(&self, lock: &RwLock<Option<String>>, what: &str) -> Option<String> {
        match lock.read() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading {what}: {e}");
                None
            }
        }
    }

    fn broadcast_progress(&self) {
        let progress = self.snapshot();
        // Ignore send errors (no subscribers is fine).
        let _ = self.progress_tx.send(progress);
    }
}
