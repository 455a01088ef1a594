// crates/client/src/initiator.rs
//! Job initiation with a zero-latency tracking surface.
//!
//! Starting a job is a POST whose round-trip can take a while. The starter
//! spawns the tracker on a placeholder id *before* the request goes out, so
//! a presenter has something to render immediately; when the server answers
//! with the real id the tracker is promoted in place. If the initiating
//! request itself fails, the tracker is torn down and the error goes to the
//! caller, never through the progress surface.

use tokio_util::sync::CancellationToken;

use jobwatch_types::TrackedId;

use crate::error::StartError;
use crate::http::ProgressClient;
use crate::poller::{JobTracker, JobWatcher, PollerConfig};

/// Starts jobs and hands back a watcher already tracking them.
pub struct JobStarter {
    client: ProgressClient,
    config: PollerConfig,
}

impl JobStarter {
    pub fn new(client: ProgressClient, config: PollerConfig) -> Self {
        Self { client, config }
    }

    /// Initiate `operation` via a POST to `path` and return its watcher.
    ///
    /// The watcher starts out holding a placeholder id and is promoted once
    /// the server responds. A response without any id leaves the watcher in
    /// its waiting state; the caller decides how long that is acceptable.
    pub async fn start(
        &self,
        operation: &str,
        path: &str,
        params: serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<JobWatcher, StartError> {
        let placeholder = TrackedId::placeholder(operation);
        tracing::debug!(operation, id = %placeholder, "starting job");

        // Child token: an initiation failure must kill this tracker without
        // cancelling anything else the caller ties to `cancel`.
        let track_cancel = cancel.child_token();
        let watcher = JobTracker::spawn(
            self.client.clone(),
            placeholder,
            self.config.clone(),
            track_cancel.clone(),
        );

        match self.client.start_job(path, &params).await {
            Ok(started) => {
                match started.id() {
                    Some(id) => watcher.promote(id),
                    None => {
                        tracing::warn!(operation, "start response carried no job id; tracker stays in waiting state");
                    }
                }
                Ok(watcher)
            }
            Err(err) => {
                track_cancel.cancel();
                Err(err)
            }
        }
    }
}
