use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::results::SearchSummary;

/// Counters shared by every worker in a run.
///
/// `files_with_matches` is the run's match counter: it is bumped exactly
/// once per file that had at least one matching line. Cloning shares the
/// underlying atomics, so the scheduler hands a clone to each task and
/// reads the totals after the pool has drained.
#[derive(Debug, Clone, Default)]
pub struct SearchMetrics {
    files_with_matches: Arc<AtomicUsize>,
    files_searched: Arc<AtomicUsize>,
    files_skipped: Arc<AtomicUsize>,
    matched_lines: Arc<AtomicUsize>,
    batches_dispatched: Arc<AtomicUsize>,
    batches_failed: Arc<AtomicUsize>,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fully read file and how many of its lines matched
    pub fn record_file_searched(&self, matched_lines: usize) {
        self.files_searched.fetch_add(1, Ordering::Relaxed);
        if matched_lines > 0 {
            self.matched_lines
                .fetch_add(matched_lines, Ordering::Relaxed);
            self.files_with_matches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_file_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_dispatched(&self) {
        self.batches_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_failed(&self) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn files_with_matches(&self) -> usize {
        self.files_with_matches.load(Ordering::Relaxed)
    }

    /// Snapshot of all counters. Only meaningful once every task has finished.
    pub fn summary(&self) -> SearchSummary {
        SearchSummary {
            files_with_matches: self.files_with_matches.load(Ordering::Relaxed),
            files_searched: self.files_searched.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            matched_lines: self.matched_lines.load(Ordering::Relaxed),
            batches_dispatched: self.batches_dispatched.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.summary();
        info!(
            "Search stats:\n\
             Files searched/skipped: {}/{}\n\
             Files with matches: {}\n\
             Matching lines: {}\n\
             Batches dispatched/failed: {}/{}",
            stats.files_searched,
            stats.files_skipped,
            stats.files_with_matches,
            stats.matched_lines,
            stats.batches_dispatched,
            stats.batches_failed
        );
    }
}
