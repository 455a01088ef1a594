// crates/cli/src/render.rs
//! Terminal rendering of tracker state.
//!
//! Everything here is a pure function of the latest [`TrackerState`]; the
//! watch loop in `main.rs` decides when to redraw.

use jobwatch_client::{StopReason, TrackerPhase, TrackerState};
use jobwatch_types::JobItemRecord;

/// Most recent log entries shown at once. Long-running jobs can produce
/// thousands of entries; the display stays bounded.
pub const LOG_TAIL_LEN: usize = 50;

/// One-line progress summary next to the bar.
pub fn progress_line(state: &TrackerState) -> String {
    if state.phase == TrackerPhase::Waiting {
        return "waiting for job id...".to_string();
    }
    let Some(snap) = &state.snapshot else {
        return "starting...".to_string();
    };

    let mut line = format!(
        "{}/{} ok {} fail {}",
        snap.current, snap.total, snap.success_count, snap.failed_count
    );
    if let Some(item) = &snap.current_item {
        line.push_str(&format!(" | {item}"));
    }
    line
}

/// Bar position in 0..=100 for the current state.
pub fn percent(state: &TrackerState) -> u64 {
    state
        .snapshot
        .as_ref()
        .map(|s| s.percent() as u64)
        .unwrap_or(0)
}

/// Lines for log entries not yet printed, advancing `printed` past them.
///
/// If a single poll brings more than [`LOG_TAIL_LEN`] unseen entries, only
/// the most recent tail is rendered, prefixed with a skip notice.
pub fn new_log_lines(state: &TrackerState, printed: &mut usize) -> Vec<String> {
    let total = state.log.len();
    if *printed >= total {
        return Vec::new();
    }

    let unseen = total - *printed;
    let mut lines = Vec::new();
    let start = if unseen > LOG_TAIL_LEN {
        lines.push(format!("... {} earlier entries not shown", unseen - LOG_TAIL_LEN));
        total - LOG_TAIL_LEN
    } else {
        *printed
    };

    for record in &state.log[start..] {
        lines.push(log_line(record));
    }
    *printed = total;
    lines
}

fn log_line(record: &JobItemRecord) -> String {
    let mark = if record.success { "ok  " } else { "FAIL" };
    format!(
        "{} {} {}",
        record.timestamp.format("%H:%M:%S"),
        mark,
        record.item
    )
}

/// Warning line for a transient poll failure, if one is pending.
pub fn transient_line(state: &TrackerState) -> Option<String> {
    state
        .transient_error
        .as_ref()
        .map(|msg| format!("warning: {msg} (will retry)"))
}

/// Final line once the tracker has stopped.
pub fn outcome_line(state: &TrackerState) -> Option<String> {
    let TrackerPhase::Stopped(reason) = state.phase else {
        return None;
    };
    let line = match reason {
        StopReason::Completed => {
            let (current, total, failed) = state
                .snapshot
                .as_ref()
                .map(|s| (s.current, s.total, s.failed_count))
                .unwrap_or((0, 0, 0));
            format!("done: {current}/{total} items processed ({failed} failed)")
        }
        StopReason::Failed => {
            let message = state
                .snapshot
                .as_ref()
                .and_then(|s| s.error_message.clone())
                .unwrap_or_else(|| "no error message reported".to_string());
            format!("job failed: {message}")
        }
        StopReason::TrackingLost => "job no longer tracked by server".to_string(),
    };
    Some(line)
}
