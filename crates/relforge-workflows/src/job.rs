//! The job contract and its execution records.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use relforge_domain::{DomainError, DomainResult, ErrorCode, FileSystemPort};

/// Shared context handed to every job operation.
///
/// Carries the cancellation token, the filesystem port, and the working
/// directory. Cloning is cheap; clones share the same token.
#[derive(Clone)]
pub struct JobContext {
    /// Cancellation signal for the whole plan.
    pub cancel: CancellationToken,
    /// Filesystem port; the only side-effectful resource.
    pub fs: Arc<dyn FileSystemPort>,
    /// Directory all relative paths resolve against.
    pub working_dir: PathBuf,
}

impl JobContext {
    /// Create a context with a fresh cancellation token.
    pub fn new(fs: Arc<dyn FileSystemPort>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            cancel: CancellationToken::new(),
            fs,
            working_dir: working_dir.into(),
        }
    }

    /// A copy of this context with its own fresh token, used for
    /// rollback sweeps that must outlive plan cancellation.
    pub fn detached(&self) -> Self {
        Self {
            cancel: CancellationToken::new(),
            fs: Arc::clone(&self.fs),
            working_dir: self.working_dir.clone(),
        }
    }

    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail with `Cancelled` if cancellation has been signalled.
    pub fn check_cancelled(&self) -> DomainResult<()> {
        if self.cancel.is_cancelled() {
            return Err(DomainError::new(
                ErrorCode::Cancelled,
                "Operation was cancelled",
            ));
        }
        Ok(())
    }

    /// Resolve a path relative to the working directory.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.working_dir.join(relative)
    }
}

impl std::fmt::Debug for JobContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobContext")
            .field("working_dir", &self.working_dir)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// A unit of work with a paired undo operation.
///
/// The orchestrator never inspects a job's internals; it only calls the
/// two operations and records their outcomes. `execute` and `rollback`
/// are the only suspension points in the system and must observe
/// cancellation at reasonable intervals.
#[async_trait]
pub trait Job: Send + Sync {
    /// Identifier, unique within a plan.
    fn id(&self) -> &str;

    /// Human-readable name for logs and reports.
    fn name(&self) -> &str;

    /// Perform the work.
    async fn execute(&self, ctx: &JobContext) -> DomainResult<()>;

    /// Undo the work. Called at most once, only after `execute`
    /// completed or failed with side effects.
    async fn rollback(&self, ctx: &JobContext) -> DomainResult<()>;
}

/// Terminal and intermediate states of a job within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Not yet admitted.
    Pending,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Undone by the rollback sweep.
    RolledBack,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::RolledBack => "rolled_back",
        })
    }
}

/// Recorded outcome of one job.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// The job's identifier.
    pub job_id: String,
    /// The job's display name.
    pub job_name: String,
    /// Current status.
    pub status: JobStatus,
    /// Error, when the job failed.
    pub error: Option<DomainError>,
    /// When execution started.
    pub started_at: DateTime<Utc>,
    /// When execution finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Wall-clock execution time.
    pub duration: Duration,
}

impl JobRecord {
    /// Whether the recorded failure is a pure cancellation observation,
    /// which needs no rollback.
    pub fn is_cancellation(&self) -> bool {
        self.status == JobStatus::Failed
            && self
                .error
                .as_ref()
                .map(|e| e.code == ErrorCode::Cancelled)
                .unwrap_or(false)
    }
}

/// Aggregate statistics over a finished plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStatistics {
    /// Jobs in the plan.
    pub total: usize,
    /// Jobs that completed.
    pub completed: usize,
    /// Jobs that failed.
    pub failed: usize,
    /// Jobs that were rolled back.
    pub rolled_back: usize,
    /// Sum of all execution durations.
    pub total_duration: Duration,
    /// Mean execution duration; zero when nothing ran.
    pub average_duration: Duration,
}
