//! Pipeline counters

use std::sync::atomic::{AtomicU64, Ordering};

use crate::tasks::TaskStatus;

/// Counters updated by the generator, workers and collector
#[derive(Debug, Default)]
pub struct Metrics {
    generated: AtomicU64,
    completed: AtomicU64,
    reported: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_generated(&self) {
        self.generated.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "generated", "Metric incremented");
    }

    pub fn task_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "completed", "Metric incremented");
    }

    pub fn task_reported(&self, status: Option<TaskStatus>) {
        self.reported.fetch_add(1, Ordering::Relaxed);
        match status {
            Some(TaskStatus::Success) => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Some(TaskStatus::Failure) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            None => {}
        }
        tracing::trace!(counter = "reported", ?status, "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            generated: self.generated.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            reported: self.reported.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub generated: u64,
    pub completed: u64,
    pub reported: u64,
    pub succeeded: u64,
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_splits_by_status() {
        let metrics = Metrics::new();
        metrics.task_generated();
        metrics.task_generated();
        metrics.task_completed();
        metrics.task_completed();
        metrics.task_reported(Some(TaskStatus::Success));
        metrics.task_reported(Some(TaskStatus::Failure));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.generated, 2);
        assert_eq!(snapshot.completed, 2);
        assert_eq!(snapshot.reported, 2);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.failed, 1);
    }
}
