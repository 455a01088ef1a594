// crates/client/src/poller.rs
//! Fixed-interval polling of a job's status until it reaches a terminal
//! state.
//!
//! [`JobTracker::spawn`] runs the loop on a Tokio task and hands back a
//! [`JobWatcher`]: a `watch` channel carrying the latest [`TrackerState`]
//! for presenters, plus a one-shot completion channel that fires exactly
//! once when a terminal status is first observed.
//!
//! The loop owns no UI lifecycle; teardown is an explicit
//! [`CancellationToken`], checked both between ticks and across the
//! in-flight request, so cancelling produces zero further state updates.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use jobwatch_types::{JobItemRecord, JobPhase, JobSnapshot, TrackedId};

use crate::error::PollError;
use crate::http::ProgressClient;
use crate::log::ItemLog;

/// Why the polling loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The server reported `completed`.
    Completed,
    /// The server reported `failed`.
    Failed,
    /// The server returned 404 for a real id. The job record expired or was
    /// never created; not an error condition.
    TrackingLost,
}

/// Lifecycle of a tracker as seen by presenters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// Holding a placeholder id; no requests are issued yet.
    Waiting,
    /// Actively polling a real id.
    Polling,
    /// The loop has exited. The last-known snapshot stays rendered.
    Stopped(StopReason),
}

/// Latest observed state of one tracked job.
///
/// Published through a `watch` channel: presenters render it as a pure
/// function of this value.
#[derive(Debug, Clone)]
pub struct TrackerState {
    pub job_id: TrackedId,
    pub phase: TrackerPhase,
    /// Last successfully fetched snapshot, if any. Retained after the loop
    /// stops so terminal state stays visible.
    pub snapshot: Option<JobSnapshot>,
    /// Accumulated per-item log, oldest first.
    pub log: Vec<JobItemRecord>,
    /// Message for the most recent transient poll failure; cleared by the
    /// next successful poll.
    pub transient_error: Option<String>,
}

impl TrackerState {
    fn new(job_id: TrackedId) -> Self {
        let phase = if job_id.is_placeholder() {
            TrackerPhase::Waiting
        } else {
            TrackerPhase::Polling
        };
        Self {
            job_id,
            phase,
            snapshot: None,
            log: Vec::new(),
            transient_error: None,
        }
    }
}

/// Tuning for the polling loop.
///
/// The interval is fixed: no backoff, no jitter. Presenters that tail the
/// log poll faster (300 ms) than plain progress bars (1000 ms).
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
        }
    }
}

impl PollerConfig {
    /// Faster cadence used by log-tailing presenters.
    pub fn follow() -> Self {
        Self {
            interval: Duration::from_millis(300),
        }
    }
}

enum TrackerCommand {
    /// Replace the held id with the authoritative one from the server.
    Promote(String),
}

/// Handle to a spawned polling task.
#[derive(Debug)]
pub struct JobWatcher {
    state_rx: watch::Receiver<TrackerState>,
    done_rx: oneshot::Receiver<JobSnapshot>,
    cmd_tx: mpsc::UnboundedSender<TrackerCommand>,
}

impl JobWatcher {
    /// Snapshot of the current tracker state.
    pub fn state(&self) -> TrackerState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state updates (for presenters).
    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state_rx.clone()
    }

    /// Hand the authoritative server id to the tracker, replacing a
    /// placeholder. Polling starts on the next tick.
    pub fn promote(&self, real_id: impl Into<String>) {
        let _ = self.cmd_tx.send(TrackerCommand::Promote(real_id.into()));
    }

    /// Wait for the job to reach a terminal state.
    ///
    /// Resolves with the final snapshot exactly once. Returns `None` if the
    /// tracker stopped without a terminal status (cancellation or tracking
    /// loss).
    pub async fn wait(self) -> Option<JobSnapshot> {
        self.done_rx.await.ok()
    }
}

/// Spawns polling loops.
pub struct JobTracker;

impl JobTracker {
    /// Start polling `id` on its own Tokio task.
    ///
    /// Placeholder ids are held without issuing requests until
    /// [`JobWatcher::promote`] supplies the real one. Cancelling `cancel`
    /// tears the loop down from any point, including mid-request.
    pub fn spawn(
        client: ProgressClient,
        id: TrackedId,
        config: PollerConfig,
        cancel: CancellationToken,
    ) -> JobWatcher {
        let (state_tx, state_rx) = watch::channel(TrackerState::new(id));
        let (done_tx, done_rx) = oneshot::channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(poll_loop(client, config, cancel, state_tx, done_tx, cmd_rx));

        JobWatcher {
            state_rx,
            done_rx,
            cmd_tx,
        }
    }
}

/// A late response must not roll progress backwards. Responses that regress
/// the item counter or the history length relative to what has already been
/// accepted are discarded (terminal responses always pass).
fn is_stale(state: &TrackerState, next: &JobSnapshot) -> bool {
    if next.status.is_terminal() {
        return false;
    }
    let regressed_history = next.items_history.len() < state.log.len();
    let regressed_counter = match &state.snapshot {
        Some(last) => next.current < last.current,
        None => false,
    };
    regressed_history || regressed_counter
}

async fn poll_loop(
    client: ProgressClient,
    config: PollerConfig,
    cancel: CancellationToken,
    state_tx: watch::Sender<TrackerState>,
    done_tx: oneshot::Sender<JobSnapshot>,
    mut cmd_rx: mpsc::UnboundedReceiver<TrackerCommand>,
) {
    let mut done_tx = Some(done_tx);
    let mut log = ItemLog::new();

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            Some(cmd) = cmd_rx.recv() => match cmd {
                TrackerCommand::Promote(real_id) => {
                    tracing::debug!(job_id = %real_id, "placeholder promoted to server id");
                    state_tx.send_modify(|s| {
                        s.job_id = TrackedId::Real(real_id);
                        s.phase = TrackerPhase::Polling;
                    });
                }
            },

            _ = ticker.tick() => {
                let job_id = state_tx.borrow().job_id.clone();
                if job_id.is_placeholder() {
                    // The server does not know this id; skip the fetch.
                    continue;
                }

                let result = tokio::select! {
                    _ = cancel.cancelled() => break,
                    res = client.fetch_status(job_id.as_str()) => res,
                };

                match result {
                    Ok(snap) => {
                        if is_stale(&state_tx.borrow(), &snap) {
                            tracing::debug!(job_id = %job_id, "discarding stale poll response");
                            continue;
                        }

                        log.merge_from(&snap.items_history);
                        let stop = match snap.status {
                            JobPhase::Completed => Some(StopReason::Completed),
                            JobPhase::Failed => Some(StopReason::Failed),
                            JobPhase::Pending | JobPhase::Running => None,
                        };

                        state_tx.send_modify(|s| {
                            s.snapshot = Some(snap.clone());
                            s.log = log.records().to_vec();
                            s.transient_error = None;
                            s.phase = match stop {
                                Some(reason) => TrackerPhase::Stopped(reason),
                                None => TrackerPhase::Polling,
                            };
                        });

                        if stop.is_some() {
                            if let Some(tx) = done_tx.take() {
                                let _ = tx.send(snap);
                            }
                            break;
                        }
                    }
                    Err(PollError::NotFound) => {
                        // Job record expired or was never created. Stop
                        // silently and leave the last-known state rendered.
                        tracing::debug!(job_id = %job_id, "job no longer tracked by server");
                        state_tx.send_modify(|s| {
                            s.phase = TrackerPhase::Stopped(StopReason::TrackingLost);
                        });
                        break;
                    }
                    Err(err) => {
                        tracing::warn!(job_id = %job_id, error = %err, "status poll failed, retrying on next tick");
                        state_tx.send_modify(|s| {
                            s.transient_error = Some(err.to_string());
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(current: u64, history_len: u64) -> JobSnapshot {
        JobSnapshot {
            job_id: "job-1".to_string(),
            status: JobPhase::Running,
            current,
            total: 10,
            description: None,
            current_item: None,
            success_count: current,
            failed_count: 0,
            error_message: None,
            items_history: (0..history_len)
                .map(|i| JobItemRecord {
                    index: i,
                    timestamp: chrono::Utc::now(),
                    item: format!("item-{i}"),
                    success: true,
                })
                .collect(),
        }
    }

    #[test]
    fn test_stale_detection() {
        let mut state = TrackerState::new(TrackedId::Real("job-1".to_string()));
        assert!(!is_stale(&state, &running(5, 3)));

        state.snapshot = Some(running(5, 3));
        state.log = running(5, 3).items_history;

        // Progress regression is stale.
        assert!(is_stale(&state, &running(3, 3)));
        // History regression is stale.
        assert!(is_stale(&state, &running(5, 2)));
        // Equal or advancing is accepted.
        assert!(!is_stale(&state, &running(5, 3)));
        assert!(!is_stale(&state, &running(7, 6)));

        // A terminal response is never discarded.
        let mut done = running(3, 2);
        done.status = JobPhase::Completed;
        assert!(!is_stale(&state, &done));
    }

    #[test]
    fn test_initial_phase_follows_id_kind() {
        let waiting = TrackerState::new(TrackedId::placeholder("collect"));
        assert_eq!(waiting.phase, TrackerPhase::Waiting);

        let polling = TrackerState::new(TrackedId::Real("job-1".to_string()));
        assert_eq!(polling.phase, TrackerPhase::Polling);
    }
}
