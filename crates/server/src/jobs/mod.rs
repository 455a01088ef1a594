// crates/server/src/jobs/mod.rs
//! Background job system for long-running batch operations.
//!
//! Provides:
//! - `JobRunner` — central manager for spawning and tracking jobs
//! - `JobState` — shared progress tracking per job
//! - `JobHandle` — cancellation handle

pub mod runner;
pub mod state;
pub mod types;

pub use runner::JobRunner;
pub use state::JobState;
pub use types::{JobHandle, JobId};
