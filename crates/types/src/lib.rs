// crates/types/src/lib.rs
//! Shared wire model for the jobwatch job-progress contract.
//!
//! These types are what the backend serializes and the polling client
//! consumes. The client never mutates a [`JobSnapshot`]; the server is the
//! sole owner of job state, and a snapshot is just the latest observation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix used for client-generated placeholder job identifiers.
///
/// A placeholder id is handed to the tracking surface before the server has
/// responded with the authoritative id. The server never sees these.
pub const PLACEHOLDER_PREFIX: &str = "temp_";

/// Lifecycle phase of a server-side job.
///
/// `Completed` and `Failed` are terminal: once reported, the server makes no
/// further transitions for that job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobPhase {
    /// True once the job can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed)
    }
}

/// One per-item outcome within a job's history log.
///
/// `items_history` is append-only and prefix-consistent across polls: a later
/// poll may return more records than an earlier one, but never fewer, and
/// never reorders already-reported entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobItemRecord {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub item: String,
    pub success: bool,
}

/// Server-reported status of a job, as returned by `GET /api/progress/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub status: JobPhase,
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_item: Option<String>,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failed_count: u64,
    /// Optional even when `status == failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub items_history: Vec<JobItemRecord>,
}

impl JobSnapshot {
    /// Progress as a whole percentage in `0..=100`.
    ///
    /// `total == 0` yields `0` (never NaN or infinity); `current > total`
    /// clamps to `100`.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.current.min(self.total) * 100 / self.total) as u8
    }

    /// True once the reported status is terminal.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Response payload of a job-initiating request.
///
/// Backends are inconsistent about the key name; some return `job_id`, some
/// `task_id`, some both, and some neither (fire-and-forget endpoints).
/// [`StartedJob::id`] resolves whichever is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl StartedJob {
    /// The trackable identifier, preferring `job_id` over `task_id`.
    pub fn id(&self) -> Option<&str> {
        self.job_id.as_deref().or(self.task_id.as_deref())
    }
}

/// A job identifier as held by a tracking surface.
///
/// A `Placeholder` exists only client-side, so the tracking UI can appear
/// with zero latency while the initiating request is still in flight.
/// Polling a placeholder is a no-op; once the real id arrives it replaces
/// the placeholder seamlessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedId {
    Placeholder(String),
    Real(String),
}

impl TrackedId {
    /// Generate a fresh placeholder id for the given operation name.
    pub fn placeholder(operation: &str) -> Self {
        let millis = Utc::now().timestamp_millis();
        TrackedId::Placeholder(format!("{PLACEHOLDER_PREFIX}{operation}_{millis}"))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, TrackedId::Placeholder(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            TrackedId::Placeholder(s) | TrackedId::Real(s) => s,
        }
    }
}

impl std::fmt::Display for TrackedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
