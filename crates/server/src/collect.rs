// crates/server/src/collect.rs
//! Simulated batch collector.
//!
//! The reference server needs jobs that actually move through the
//! pending → running → terminal lifecycle and emit per-item history.
//! This collector walks a list of item names with a configurable per-item
//! delay instead of talking to a real data source.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::oneshot;

use crate::jobs::JobState;

/// Item count used when a request names neither items nor a count.
pub const DEFAULT_ITEM_COUNT: u64 = 20;

/// Every sixth item is reported as failed so failure tallies and log
/// rendering get exercised.
const FAILURE_STRIDE: u64 = 6;

/// Tuning for the simulated collector.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Simulated work time per item.
    pub item_delay: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            item_delay: Duration::from_millis(500),
        }
    }
}

/// Body of `POST /api/collect`.
#[derive(Debug, Deserialize)]
pub struct CollectRequest {
    /// Data source label (e.g. "krx", "dart"). Becomes the job type.
    pub source: String,
    /// Explicit item names to collect. Takes precedence over `count`.
    #[serde(default)]
    pub items: Vec<String>,
    /// Number of synthetic items when `items` is empty.
    #[serde(default)]
    pub count: Option<u64>,
    /// Accepted for API compatibility; the simulated collector is serial.
    #[serde(default)]
    pub workers: Option<u32>,
}

impl CollectRequest {
    /// Resolve the list of item names this request asks for.
    pub fn item_names(&self) -> Vec<String> {
        if !self.items.is_empty() {
            return self.items.clone();
        }
        let count = self.count.unwrap_or(DEFAULT_ITEM_COUNT);
        (0..count)
            .map(|i| format!("{}-{:04}", self.source, i))
            .collect()
    }
}

/// Run one collection job to completion, recording per-item outcomes.
///
/// Checks the cancellation channel between items; a cancelled job fails
/// with a "cancelled" error like any other failure.
pub async fn run_collection(
    state: Arc<JobState>,
    mut cancel_rx: oneshot::Receiver<()>,
    description: String,
    items: Vec<String>,
    item_delay: Duration,
) -> Result<(), String> {
    state.set_description(description);

    for (i, item) in items.into_iter().enumerate() {
        if cancel_rx.try_recv().is_ok() {
            return Err("cancelled".to_string());
        }

        tokio::time::sleep(item_delay).await;

        let success = (i as u64 + 1) % FAILURE_STRIDE != 0;
        state.record_item(item, success);
    }

    Ok(())
}
