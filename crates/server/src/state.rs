// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use crate::collect::CollectorSettings;
use crate::jobs::JobRunner;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Background job runner for long-running batch operations.
    pub jobs: Arc<JobRunner>,
    /// Tuning for the simulated collector.
    pub collector: CollectorSettings,
    /// When set, every request must carry `Authorization: Bearer <token>`.
    pub auth_token: Option<String>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(collector: CollectorSettings, auth_token: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            jobs: Arc::new(JobRunner::new()),
            collector,
            auth_token,
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_has_no_jobs() {
        let state = AppState::new(CollectorSettings::default(), None);
        assert!(state.jobs.active_jobs().is_empty());
        assert!(state.auth_token.is_none());
    }
}
