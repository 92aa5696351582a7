//! Progress reporting for plan execution.
//!
//! Hosts that render live progress register a [`StatusListener`] on the
//! manager; every job status change is delivered as a [`JobEvent`]. The
//! default listener logs through `tracing` and keeps a running progress
//! snapshot.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::job::JobStatus;

/// One job status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEvent {
    /// The job's identifier.
    pub job_id: String,
    /// The job's display name.
    pub job_name: String,
    /// The status the job moved to.
    pub status: JobStatus,
    /// When the change happened.
    pub at: DateTime<Utc>,
}

/// Receives job status changes during plan execution.
///
/// Implementations must be cheap and non-blocking; they are invoked
/// from the execution path.
pub trait StatusListener: Send + Sync {
    /// Called on every job status change.
    fn on_event(&self, event: &JobEvent);
}

/// Point-in-time view of plan progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    /// Jobs in the plan.
    pub total: usize,
    /// Jobs that reached a terminal status.
    pub finished: usize,
    /// Jobs currently running.
    pub running: usize,
}

impl ProgressSnapshot {
    /// Completion percentage, 0-100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.finished * 100) / self.total).min(100) as u8
    }
}

/// Listener that tracks a progress snapshot and logs every change.
#[derive(Default)]
pub struct ProgressTracker {
    total: usize,
    state: Mutex<ProgressSnapshot>,
}

impl ProgressTracker {
    /// Create a tracker for a plan of `total` jobs.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            state: Mutex::new(ProgressSnapshot {
                total,
                finished: 0,
                running: 0,
            }),
        }
    }

    /// Create a shareable tracker.
    pub fn shared(total: usize) -> Arc<Self> {
        Arc::new(Self::new(total))
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusListener for ProgressTracker {
    fn on_event(&self, event: &JobEvent) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.total = self.total;
        match event.status {
            JobStatus::Running => state.running += 1,
            JobStatus::Completed | JobStatus::Failed => {
                state.running = state.running.saturating_sub(1);
                state.finished += 1;
            }
            JobStatus::Pending | JobStatus::RolledBack => {}
        }
        debug!(
            job = %event.job_name,
            status = %event.status,
            percent = state.percent(),
            "job status changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, status: JobStatus) -> JobEvent {
        JobEvent {
            job_id: id.to_string(),
            job_name: id.to_string(),
            status,
            at: Utc::now(),
        }
    }

    #[test]
    fn tracker_counts_running_and_finished_jobs() {
        let tracker = ProgressTracker::new(2);
        tracker.on_event(&event("a", JobStatus::Running));
        assert_eq!(tracker.snapshot().running, 1);
        assert_eq!(tracker.snapshot().finished, 0);

        tracker.on_event(&event("a", JobStatus::Completed));
        tracker.on_event(&event("b", JobStatus::Running));
        tracker.on_event(&event("b", JobStatus::Failed));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.finished, 2);
        assert_eq!(snapshot.running, 0);
        assert_eq!(snapshot.percent(), 100);
    }

    #[test]
    fn empty_plans_are_complete() {
        assert_eq!(ProgressSnapshot::default().percent(), 100);
    }

    #[test]
    fn percent_is_halfway_after_one_of_two() {
        let tracker = ProgressTracker::new(2);
        tracker.on_event(&event("a", JobStatus::Running));
        tracker.on_event(&event("a", JobStatus::Completed));
        assert_eq!(tracker.snapshot().percent(), 50);
    }
}
