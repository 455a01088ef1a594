// crates/client/src/lib.rs
//! Polling client for the jobwatch job-progress contract.
//!
//! Provides:
//! - [`ProgressClient`] — HTTP layer with explicit credentials
//! - [`JobStarter`] — job initiation with placeholder-id hand-off
//! - [`JobTracker`] / [`JobWatcher`] — fixed-interval status polling with
//!   cancellation and one-shot completion
//! - [`ItemLog`] — idempotent accumulation of per-item outcome records

pub mod error;
pub mod http;
pub mod initiator;
pub mod log;
pub mod poller;

pub use error::{PollError, StartError};
pub use http::{Credentials, ProgressClient};
pub use initiator::JobStarter;
pub use log::ItemLog;
pub use poller::{JobTracker, JobWatcher, PollerConfig, StopReason, TrackerPhase, TrackerState};
