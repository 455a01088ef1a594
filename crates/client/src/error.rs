// crates/client/src/error.rs
use thiserror::Error;

/// Errors surfaced by a single status poll.
///
/// `NotFound` is special-cased because the poller treats it as a silent
/// terminal condition (tracking loss), not a retryable failure.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("job not found")]
    NotFound,

    #[error("server returned status {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid status payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PollError {
    /// Whether the next poll tick should still run after this error.
    ///
    /// Everything except `NotFound` is assumed to be a momentary blip the
    /// next tick can recover from.
    pub fn is_transient(&self) -> bool {
        !matches!(self, PollError::NotFound)
    }
}

/// Errors from a job-initiating request.
///
/// Initiation failures are terminal for that attempt: no tracking starts,
/// and the error is surfaced to the caller instead of the progress surface.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server rejected job start with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid start response: {0}")]
    Decode(#[from] serde_json::Error),
}
