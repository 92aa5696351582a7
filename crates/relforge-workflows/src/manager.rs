//! Plan execution with recorded results and reverse-order rollback.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use relforge_domain::{DomainError, DomainResult, ErrorCode};

use crate::job::{Job, JobContext, JobRecord, JobStatus, PlanStatistics};
use crate::progress::{JobEvent, StatusListener};

/// Default bound on concurrently running jobs.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 3;

/// Default whole-plan timeout.
pub const DEFAULT_PLAN_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Grace period granted to the rollback sweep after cancellation.
const ROLLBACK_GRACE: Duration = Duration::from_secs(30);

/// How a plan's jobs are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One job at a time, in plan order, stopping at the first failure.
    Sequential,
    /// Admission in plan order with at most `max_in_flight` running;
    /// the first failure cancels the plan and stops further admission.
    BoundedParallel {
        /// Upper bound on concurrently running jobs; at least 1.
        max_in_flight: usize,
    },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Sequential
    }
}

/// Runs an ordered plan of jobs and records every outcome.
///
/// All shared mutation happens under one internal mutex; public
/// snapshots are copies.
pub struct JobManager {
    jobs: Vec<Arc<dyn Job>>,
    results: Arc<Mutex<Vec<JobRecord>>>,
    mode: ExecutionMode,
    timeout: Duration,
    listener: Option<Arc<dyn StatusListener>>,
}

impl JobManager {
    /// Create an empty sequential plan with the default timeout.
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            results: Arc::new(Mutex::new(Vec::new())),
            mode: ExecutionMode::Sequential,
            timeout: DEFAULT_PLAN_TIMEOUT,
            listener: None,
        }
    }

    /// Register a listener for job status changes.
    pub fn set_listener(&mut self, listener: Arc<dyn StatusListener>) -> &mut Self {
        self.listener = Some(listener);
        self
    }

    /// Append a job to the plan.
    pub fn add_job(&mut self, job: Arc<dyn Job>) -> &mut Self {
        self.jobs.push(job);
        self
    }

    /// Set the scheduling mode. A `BoundedParallel` bound below 1 is
    /// raised to 1.
    pub fn set_mode(&mut self, mode: ExecutionMode) -> &mut Self {
        self.mode = match mode {
            ExecutionMode::BoundedParallel { max_in_flight } => ExecutionMode::BoundedParallel {
                max_in_flight: max_in_flight.max(1),
            },
            other => other,
        };
        self
    }

    /// Set the whole-plan timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Number of jobs in the plan.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Snapshot of all recorded results.
    pub fn results(&self) -> Vec<JobRecord> {
        self.lock_results().clone()
    }

    /// Aggregate statistics over the recorded results.
    pub fn statistics(&self) -> PlanStatistics {
        let results = self.lock_results();
        let total_duration: Duration = results.iter().map(|r| r.duration).sum();
        let completed = results
            .iter()
            .filter(|r| r.status == JobStatus::Completed)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == JobStatus::Failed)
            .count();
        let rolled_back = results
            .iter()
            .filter(|r| r.status == JobStatus::RolledBack)
            .count();
        let average_duration = if results.is_empty() {
            Duration::ZERO
        } else {
            total_duration / results.len() as u32
        };
        PlanStatistics {
            total: self.jobs.len(),
            completed,
            failed,
            rolled_back,
            total_duration,
            average_duration,
        }
    }

    /// Execute the plan.
    ///
    /// On any failure the rollback sweep runs before the error is
    /// returned: failed jobs first, then completed jobs in reverse
    /// completion order. The sweep also runs on timeout and external
    /// cancellation, under its own grace period and a detached
    /// cancellation token.
    pub async fn execute_plan(&self, ctx: &JobContext) -> DomainResult<()> {
        self.verify_unique_ids()?;
        self.lock_results().clear();

        info!(
            jobs = self.jobs.len(),
            mode = ?self.mode,
            timeout_secs = self.timeout.as_secs(),
            "starting plan"
        );

        let run = async {
            match self.mode {
                ExecutionMode::Sequential => self.run_sequential(ctx).await,
                ExecutionMode::BoundedParallel { max_in_flight } => {
                    self.run_parallel(ctx, max_in_flight).await
                }
            }
        };

        let outcome = match tokio::time::timeout(self.timeout, run).await {
            Ok(outcome) => outcome,
            Err(_) => {
                ctx.cancel.cancel();
                Err(DomainError::new(ErrorCode::Timeout, "Plan timed out")
                    .with_details(self.composite_status()))
            }
        };

        if let Err(err) = outcome {
            warn!(error = %err, "plan failed, starting rollback sweep");
            self.rollback_sweep(ctx).await;
            return Err(err);
        }

        info!("plan completed");
        Ok(())
    }

    fn verify_unique_ids(&self) -> DomainResult<()> {
        let mut seen = std::collections::HashSet::new();
        for job in &self.jobs {
            if !seen.insert(job.id()) {
                return Err(
                    DomainError::new(ErrorCode::JobFailed, "Duplicate job id in plan")
                        .with_details(format!("'{}' appears more than once", job.id())),
                );
            }
        }
        Ok(())
    }

    async fn run_sequential(&self, ctx: &JobContext) -> DomainResult<()> {
        for job in &self.jobs {
            if ctx.is_cancelled() {
                return Err(DomainError::new(ErrorCode::Cancelled, "Plan was cancelled")
                    .with_details(self.composite_status()));
            }

            let record = Self::run_job(job, ctx, self.listener.clone()).await;
            let failed = record.status == JobStatus::Failed;
            let job_name = record.job_name.clone();
            let cause = record.error.clone();
            self.lock_results().push(record);

            if failed {
                let mut err = DomainError::new(ErrorCode::JobFailed, "Job failed")
                    .with_details(format!("job '{job_name}' failed"))
                    .with_context(job.id().to_string());
                if let Some(cause) = cause {
                    err = err.with_cause(cause);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    async fn run_parallel(&self, ctx: &JobContext, max_in_flight: usize) -> DomainResult<()> {
        let semaphore = Arc::new(Semaphore::new(max_in_flight));
        let mut handles = Vec::new();

        for job in &self.jobs {
            if ctx.is_cancelled() {
                debug!("cancellation observed, stopping admission");
                break;
            }

            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|_| {
                    DomainError::new(ErrorCode::JobFailed, "Admission semaphore closed")
                })?;

            if ctx.is_cancelled() {
                drop(permit);
                break;
            }

            let job = Arc::clone(job);
            let task_ctx = ctx.clone();
            let results = Arc::clone(&self.results);
            let cancel = ctx.cancel.clone();
            let listener = self.listener.clone();

            handles.push(tokio::spawn(async move {
                let record = Self::run_job(&job, &task_ctx, listener).await;
                let failed = record.status == JobStatus::Failed;
                results
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(record);
                if failed {
                    // First failure stops further admission and tells
                    // in-flight jobs to wrap up.
                    cancel.cancel();
                }
                drop(permit);
                failed
            }));
        }

        let mut any_failed = false;
        for handle in handles {
            match handle.await {
                Ok(failed) => any_failed = any_failed || failed,
                Err(join_err) => {
                    error!(error = %join_err, "job task panicked");
                    any_failed = true;
                }
            }
        }

        if any_failed {
            return Err(DomainError::new(ErrorCode::JobFailed, "Plan failed")
                .with_details(self.composite_status()));
        }

        if ctx.is_cancelled() {
            return Err(DomainError::new(ErrorCode::Cancelled, "Plan was cancelled")
                .with_details(self.composite_status()));
        }

        Ok(())
    }

    async fn run_job(
        job: &Arc<dyn Job>,
        ctx: &JobContext,
        listener: Option<Arc<dyn StatusListener>>,
    ) -> JobRecord {
        let started_at = Utc::now();
        let start = Instant::now();
        info!(job = %job.name(), "executing job");
        Self::notify(&listener, job.id(), job.name(), JobStatus::Running);

        let result = job.execute(ctx).await;
        let duration = start.elapsed();
        let finished_at = Utc::now();

        let record = match result {
            Ok(()) => {
                info!(job = %job.name(), ms = duration.as_millis() as u64, "job completed");
                JobRecord {
                    job_id: job.id().to_string(),
                    job_name: job.name().to_string(),
                    status: JobStatus::Completed,
                    error: None,
                    started_at,
                    finished_at: Some(finished_at),
                    duration,
                }
            }
            Err(err) => {
                error!(job = %job.name(), error = %err, "job failed");
                JobRecord {
                    job_id: job.id().to_string(),
                    job_name: job.name().to_string(),
                    status: JobStatus::Failed,
                    error: Some(err),
                    started_at,
                    finished_at: Some(finished_at),
                    duration,
                }
            }
        };

        Self::notify(&listener, &record.job_id, &record.job_name, record.status);
        record
    }

    fn notify(
        listener: &Option<Arc<dyn StatusListener>>,
        job_id: &str,
        job_name: &str,
        status: JobStatus,
    ) {
        if let Some(listener) = listener {
            listener.on_event(&JobEvent {
                job_id: job_id.to_string(),
                job_name: job_name.to_string(),
                status,
                at: Utc::now(),
            });
        }
    }

    /// Reverse-order rollback: failed jobs first, then completed jobs in
    /// reverse completion order. A failing rollback is logged and the
    /// sweep continues. Jobs that merely observed cancellation are
    /// skipped. Runs under a detached token so plan cancellation cannot
    /// starve it, bounded by a short grace period.
    async fn rollback_sweep(&self, ctx: &JobContext) {
        let rollback_ctx = ctx.detached();
        let sweep = self.rollback_inner(&rollback_ctx);
        if tokio::time::timeout(ROLLBACK_GRACE, sweep).await.is_err() {
            error!("rollback sweep exceeded its grace period");
        }
    }

    async fn rollback_inner(&self, ctx: &JobContext) {
        let snapshot = self.results();

        let mut to_roll_back: Vec<String> = Vec::new();
        for record in snapshot.iter() {
            if record.status == JobStatus::Failed && !record.is_cancellation() {
                to_roll_back.push(record.job_id.clone());
            }
        }
        for record in snapshot.iter().rev() {
            if record.status == JobStatus::Completed {
                to_roll_back.push(record.job_id.clone());
            }
        }

        info!(jobs = to_roll_back.len(), "rolling back");

        for job_id in to_roll_back {
            let Some(job) = self.jobs.iter().find(|j| j.id() == job_id) else {
                continue;
            };

            info!(job = %job.name(), "rolling back job");
            match job.rollback(ctx).await {
                Ok(()) => {
                    self.mark_rolled_back(&job_id);
                }
                Err(err) => {
                    // The sweep keeps going; one stuck rollback must not
                    // strand the rest.
                    error!(job = %job.name(), error = %err, "rollback failed");
                }
            }
        }
    }

    fn mark_rolled_back(&self, job_id: &str) {
        let swept = {
            let mut results = self.lock_results();
            results.iter_mut().find(|r| r.job_id == job_id).map(|record| {
                record.status = JobStatus::RolledBack;
                (record.job_id.clone(), record.job_name.clone())
            })
        };
        if let Some((id, name)) = swept {
            Self::notify(&self.listener, &id, &name, JobStatus::RolledBack);
        }
    }

    fn composite_status(&self) -> String {
        let results = self.lock_results();
        if results.is_empty() {
            return "no jobs were admitted".to_string();
        }
        results
            .iter()
            .map(|r| format!("{}={}", r.job_id, r.status))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn lock_results(&self) -> std::sync::MutexGuard<'_, Vec<JobRecord>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}
