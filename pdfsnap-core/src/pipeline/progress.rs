//! Progress tracking for a run

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Point-in-time view of a run's progress
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    pub total_docs: usize,
    pub completed_docs: usize,
    pub failed_docs: usize,
    pub cancelled_docs: usize,
    pub running_docs: usize,
    pub start_time: Instant,
}

impl ProgressInfo {
    /// Documents that will not run anymore, whatever their outcome
    pub fn finished_docs(&self) -> usize {
        self.completed_docs + self.failed_docs + self.cancelled_docs
    }

    /// Share of finished documents (0.0 - 100.0)
    pub fn percentage(&self) -> f64 {
        if self.total_docs == 0 {
            100.0
        } else {
            (self.finished_docs() as f64 / self.total_docs as f64) * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.finished_docs() >= self.total_docs
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn format_progress(&self) -> String {
        let mut line = format!(
            "{}/{} ({:.1}%) - {} running, {} failed",
            self.finished_docs(),
            self.total_docs,
            self.percentage(),
            self.running_docs,
            self.failed_docs
        );
        if self.cancelled_docs > 0 {
            line.push_str(&format!(", {} cancelled", self.cancelled_docs));
        }
        line
    }
}

/// Shared counters updated by the document tasks
pub struct RunProgress {
    total_docs: AtomicUsize,
    completed_docs: AtomicUsize,
    failed_docs: AtomicUsize,
    cancelled_docs: AtomicUsize,
    running_docs: AtomicUsize,
    start_time: Instant,
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RunProgress {
    pub fn new() -> Self {
        Self {
            total_docs: AtomicUsize::new(0),
            completed_docs: AtomicUsize::new(0),
            failed_docs: AtomicUsize::new(0),
            cancelled_docs: AtomicUsize::new(0),
            running_docs: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn add_docs(&self, count: usize) {
        self.total_docs.fetch_add(count, Ordering::SeqCst);
    }

    pub fn start_doc(&self) {
        self.running_docs.fetch_add(1, Ordering::SeqCst);
    }

    pub fn complete_doc(&self) {
        self.running_docs.fetch_sub(1, Ordering::SeqCst);
        self.completed_docs.fetch_add(1, Ordering::SeqCst);
    }

    pub fn fail_doc(&self) {
        self.running_docs.fetch_sub(1, Ordering::SeqCst);
        self.failed_docs.fetch_add(1, Ordering::SeqCst);
    }

    /// Count a document that was cancelled before it started
    pub fn skip_doc(&self) {
        self.cancelled_docs.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_info(&self) -> ProgressInfo {
        ProgressInfo {
            total_docs: self.total_docs.load(Ordering::SeqCst),
            completed_docs: self.completed_docs.load(Ordering::SeqCst),
            failed_docs: self.failed_docs.load(Ordering::SeqCst),
            cancelled_docs: self.cancelled_docs.load(Ordering::SeqCst),
            running_docs: self.running_docs.load(Ordering::SeqCst),
            start_time: self.start_time,
        }
    }
}
