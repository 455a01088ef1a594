// crates/client/src/log.rs
//! Append-only accumulation of per-item outcome records.
//!
//! Each poll returns the full `items_history` the server knows about. The
//! history is prefix-consistent across polls, so accumulating it locally is
//! a matter of appending whatever suffix we have not seen yet. Repeated
//! polls of the same state must not duplicate or reorder entries.

use jobwatch_types::JobItemRecord;

/// Locally accumulated log of per-item outcomes for one job.
#[derive(Debug, Default)]
pub struct ItemLog {
    records: Vec<JobItemRecord>,
}

impl ItemLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a freshly polled history view into the log.
    ///
    /// Appends only the unseen suffix; a view that is shorter than or equal
    /// in length to what has already been accumulated is a no-op. Returns
    /// the number of records appended.
    pub fn merge_from(&mut self, history: &[JobItemRecord]) -> usize {
        if history.len() <= self.records.len() {
            return 0;
        }
        let fresh = &history[self.records.len()..];
        self.records.extend_from_slice(fresh);
        fresh.len()
    }

    /// All accumulated records, oldest first.
    pub fn records(&self) -> &[JobItemRecord] {
        &self.records
    }

    /// The most recent `n` records, oldest first.
    pub fn tail(&self, n: usize) -> &[JobItemRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn record(index: u64, item: &str) -> JobItemRecord {
        JobItemRecord {
            index,
            timestamp: DateTime::<Utc>::from_timestamp(index as i64, 0).unwrap(),
            item: item.to_string(),
            success: index % 2 == 0,
        }
    }

    fn history(n: u64) -> Vec<JobItemRecord> {
        (0..n).map(|i| record(i, &format!("item-{i}"))).collect()
    }

    #[test]
    fn test_merge_appends_only_unseen_suffix() {
        let mut log = ItemLog::new();

        assert_eq!(log.merge_from(&history(3)), 3);
        assert_eq!(log.merge_from(&history(3)), 0);
        assert_eq!(log.merge_from(&history(7)), 4);

        let items: Vec<&str> = log.records().iter().map(|r| r.item.as_str()).collect();
        assert_eq!(
            items,
            vec!["item-0", "item-1", "item-2", "item-3", "item-4", "item-5", "item-6"]
        );
    }

    #[test]
    fn test_merge_ignores_shrunk_view() {
        let mut log = ItemLog::new();
        log.merge_from(&history(5));

        // A shorter view never removes accumulated records.
        assert_eq!(log.merge_from(&history(2)), 0);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_accumulated_log_matches_latest_view() {
        // Polling the same growing history repeatedly converges on exactly
        // the latest view, regardless of how many polls happened.
        let mut log = ItemLog::new();
        for len in [0u64, 1, 1, 3, 3, 3, 6, 10, 10] {
            log.merge_from(&history(len));
        }
        assert_eq!(log.records(), history(10).as_slice());
    }

    #[test]
    fn test_tail_bounds() {
        let mut log = ItemLog::new();
        log.merge_from(&history(5));

        assert_eq!(log.tail(2).len(), 2);
        assert_eq!(log.tail(2)[0].item, "item-3");
        assert_eq!(log.tail(50).len(), 5);
        assert!(log.tail(0).is_empty());
    }
}
