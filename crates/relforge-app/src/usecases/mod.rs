//! The three use-case operations.

mod generate;
mod init;
mod validate;

pub use generate::generate_workflow;
pub use init::init_workflow;
pub use validate::validate_workflow;

use std::path::PathBuf;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info};

use relforge_domain::{
    ConfigState, Configuration, DomainError, ErrorCode, FileSystemPort,
};
use relforge_workflows::{JobContext, WorkflowBuilder, WorkflowKind};

use crate::report::Report;
use crate::settings::Settings;

/// External ports and switches for a use-case invocation.
#[derive(Clone)]
pub struct UseCaseOptions {
    /// Filesystem port.
    pub fs: Arc<dyn FileSystemPort>,
    /// Directory artifacts are generated into.
    pub working_dir: PathBuf,
    /// Host-tunable settings.
    pub settings: Settings,
    /// Overwrite existing artifacts, keeping single-slot backups.
    pub force: bool,
}

impl UseCaseOptions {
    /// Create options with default settings.
    pub fn new(fs: Arc<dyn FileSystemPort>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            working_dir: working_dir.into(),
            settings: Settings::default(),
            force: false,
        }
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the force switch.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Isolate a use-case future from panics: unexpected faults become an
/// `EmitFailed` report instead of crossing the boundary.
pub(crate) async fn shielded<F>(operation: F) -> Report
where
    F: std::future::Future<Output = Report>,
{
    match std::panic::AssertUnwindSafe(operation).catch_unwind().await {
        Ok(report) => report,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(panic = %message, "use case panicked");

            let mut report = Report::new();
            report.add_error(
                DomainError::new(ErrorCode::EmitFailed, "Unexpected fault during operation")
                    .with_details(message),
            );
            report
        }
    }
}

/// Validate-then-generate shared by `init` and `generate`: the
/// configuration must already be in the `Valid` state.
pub(crate) async fn run_generation(
    config: &mut Configuration,
    opts: &UseCaseOptions,
    report: &mut Report,
) {
    if let Err(err) = config.transition_to(ConfigState::Processing) {
        report.add_error(err);
        report.final_state = Some(config.state());
        return;
    }

    let builder = WorkflowBuilder::new(
        opts.settings.manifest_path.clone(),
        opts.settings.workflow_dir.clone(),
        opts.settings.workflow_file.clone(),
    );
    let mut plan = builder.build(WorkflowKind::FullSetup, config, opts.force);
    if opts.settings.plan_timeout_secs != Settings::default().plan_timeout_secs {
        plan.set_timeout(opts.settings.plan_timeout());
    }

    let ctx = JobContext::new(Arc::clone(&opts.fs), opts.working_dir.clone());

    match plan.execute(&ctx).await {
        Ok(()) => {
            // A failed transition here would be a state-machine bug, not
            // a user error; surface it like any other.
            if let Err(err) = config.transition_to(ConfigState::Generated) {
                report.add_error(err);
            } else {
                info!(plan = %plan.name, "generation succeeded");
                report
                    .generated_files
                    .push(opts.working_dir.join(&opts.settings.manifest_path));
                if config.should_emit_workflow() {
                    report.generated_files.push(
                        opts.working_dir
                            .join(&opts.settings.workflow_dir)
                            .join(&opts.settings.workflow_file),
                    );
                }
            }
        }
        Err(plan_err) => {
            let _ = config.transition_to(ConfigState::Invalid);

            // One top-level error per failed step, plus the rollback
            // outcome.
            let mut reported = false;
            for record in plan.results() {
                if let Some(step_err) = record.error {
                    report.add_error(step_err);
                    reported = true;
                }
            }
            if !reported {
                report.add_error(plan_err);
            }

            let stats = plan.statistics();
            if stats.rolled_back > 0 {
                report.add_recommendation(format!(
                    "{} completed step(s) were rolled back; the working directory was restored",
                    stats.rolled_back
                ));
            }
        }
    }

    report.final_state = Some(config.state());
}
