// crates/server/src/jobs/types.rs
//! Identifier and handle types for the background job system.

use tokio::sync::oneshot;

/// Opaque identifier for a job. Clients treat it as an arbitrary string;
/// the runner mints UUIDs.
pub type JobId = String;

/// Handle to a running job, used for cancellation.
///
/// Dropping the handle does NOT cancel the job; only an explicit
/// [`JobHandle::cancel`] does.
pub struct JobHandle {
    pub id: JobId,
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl JobHandle {
    pub(crate) fn new(id: JobId, cancel_tx: oneshot::Sender<()>) -> Self {
        Self {
            id,
            cancel_tx: Some(cancel_tx),
        }
    }

    /// Cancel the job. Returns true if the cancellation signal was sent.
    pub fn cancel(mut self) -> bool {
        if let Some(tx) = self.cancel_tx.take() {
            tx.send(()).is_ok()
        } else {
            false
        }
    }
}
