//! Named plans and the builder that assembles them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use relforge_domain::{Configuration, DomainResult};

use crate::job::{JobContext, JobRecord, PlanStatistics};
use crate::jobs::{
    CiWorkflowGenerationJob, DependencyCheckJob, ManifestGenerationJob, ProjectValidationJob,
};
use crate::manager::{ExecutionMode, JobManager};
use crate::migration::{ConfigBackupJob, ConfigMigrationJob, ConfigUpdateJob, MigrationValidationJob};

/// A named, described plan with its own timeout.
pub struct Workflow {
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    manager: JobManager,
}

impl Workflow {
    /// Execute the plan; failures arrive after the rollback sweep ran.
    pub async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        self.manager.execute_plan(ctx).await
    }

    /// Override the plan timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.manager.set_timeout(timeout);
    }

    /// Snapshot of all job records.
    pub fn results(&self) -> Vec<JobRecord> {
        self.manager.results()
    }

    /// Aggregate statistics.
    pub fn statistics(&self) -> PlanStatistics {
        self.manager.statistics()
    }
}

/// The plan shapes the facade knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    /// Validation, dependency check, manifest, and workflow generation.
    FullSetup,
    /// Validation and manifest generation only.
    ManifestOnly,
    /// Project-structure validation only.
    ValidationOnly,
}

/// Assembles plans against the host's file layout.
pub struct WorkflowBuilder {
    manifest_path: PathBuf,
    workflow_dir: PathBuf,
    workflow_file: String,
}

impl WorkflowBuilder {
    /// Create a builder for the given artifact locations, all relative
    /// to the working directory.
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        workflow_dir: impl Into<PathBuf>,
        workflow_file: impl Into<String>,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            workflow_dir: workflow_dir.into(),
            workflow_file: workflow_file.into(),
        }
    }

    /// Build one of the generation plans. Plans are strictly sequential;
    /// each step depends on the one before it.
    pub fn build(&self, kind: WorkflowKind, config: &Configuration, force: bool) -> Workflow {
        let mut manager = JobManager::new();
        manager.set_mode(ExecutionMode::Sequential);

        match kind {
            WorkflowKind::FullSetup => {
                manager.add_job(Arc::new(ProjectValidationJob));
                manager.add_job(Arc::new(DependencyCheckJob::for_config(config)));
                manager.add_job(Arc::new(ManifestGenerationJob::new(
                    config.clone(),
                    self.manifest_path.clone(),
                    force,
                )));
                if config.should_emit_workflow() {
                    manager.add_job(Arc::new(CiWorkflowGenerationJob::new(
                        config.clone(),
                        self.workflow_dir.clone(),
                        self.workflow_file.clone(),
                        force,
                    )));
                }
                manager.set_timeout(Duration::from_secs(10 * 60));
            }
            WorkflowKind::ManifestOnly => {
                manager.add_job(Arc::new(ProjectValidationJob));
                manager.add_job(Arc::new(ManifestGenerationJob::new(
                    config.clone(),
                    self.manifest_path.clone(),
                    force,
                )));
                manager.set_timeout(Duration::from_secs(5 * 60));
            }
            WorkflowKind::ValidationOnly => {
                manager.add_job(Arc::new(ProjectValidationJob));
                manager.set_timeout(Duration::from_secs(2 * 60));
            }
        }

        Workflow {
            name: match kind {
                WorkflowKind::FullSetup => "Full Setup".to_string(),
                WorkflowKind::ManifestOnly => "Manifest Generation".to_string(),
                WorkflowKind::ValidationOnly => "Project Validation".to_string(),
            },
            description: match kind {
                WorkflowKind::FullSetup => {
                    "Complete release setup with all configured artifacts".to_string()
                }
                WorkflowKind::ManifestOnly => "Generate the release manifest only".to_string(),
                WorkflowKind::ValidationOnly => "Validate the project structure only".to_string(),
            },
            manager,
        }
    }

    /// Build a migration plan: snapshot, compatibility check, re-render.
    pub fn build_migrate(
        &self,
        from_version: &str,
        to_version: &str,
        config: &Configuration,
    ) -> Workflow {
        let mut manager = JobManager::new();
        manager
            .set_mode(ExecutionMode::Sequential)
            .set_timeout(Duration::from_secs(15 * 60));
        manager.add_job(Arc::new(ConfigBackupJob::new(self.manifest_path.clone())));
        manager.add_job(Arc::new(MigrationValidationJob::new(
            from_version,
            to_version,
        )));
        manager.add_job(Arc::new(ConfigMigrationJob::new(
            config.clone(),
            self.manifest_path.clone(),
        )));

        Workflow {
            name: format!("Migration {from_version} -> {to_version}"),
            description: format!(
                "Migrate the release configuration from {from_version} to {to_version}"
            ),
            manager,
        }
    }

    /// Build an update plan; `dry_run` reports changes without writing.
    pub fn build_update(&self, config: &Configuration, dry_run: bool) -> Workflow {
        let mut manager = JobManager::new();
        manager
            .set_mode(ExecutionMode::Sequential)
            .set_timeout(Duration::from_secs(10 * 60));
        manager.add_job(Arc::new(ProjectValidationJob));
        manager.add_job(Arc::new(ConfigBackupJob::new(self.manifest_path.clone())));
        manager.add_job(Arc::new(ConfigUpdateJob::new(
            config.clone(),
            self.manifest_path.clone(),
            dry_run,
        )));

        Workflow {
            name: "Update Configuration".to_string(),
            description: format!("Update the release configuration (dry-run: {dry_run})"),
            manager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relforge_domain::{CiGenerationLevel, TriggerKind};

    fn config_with_ci() -> Configuration {
        let mut config = Configuration::new();
        config.project_name = "tool".to_string();
        config.ci_generation_level = CiGenerationLevel::Basic;
        config.triggers = vec![TriggerKind::VersionTags];
        config.apply_defaults();
        config
    }

    fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new(".releaser.yaml", ".ci/workflows", "release.yml")
    }

    #[test]
    fn full_setup_includes_the_workflow_job_only_when_ci_is_on() {
        let with_ci = builder().build(WorkflowKind::FullSetup, &config_with_ci(), false);
        assert_eq!(with_ci.name, "Full Setup");

        let mut no_ci = config_with_ci();
        no_ci.ci_generation_level = CiGenerationLevel::None;
        let without = builder().build(WorkflowKind::FullSetup, &no_ci, false);

        // One fewer job without CI generation.
        assert_eq!(
            with_ci.statistics().total,
            without.statistics().total + 1
        );
    }

    #[test]
    fn validation_only_is_a_single_job() {
        let plan = builder().build(WorkflowKind::ValidationOnly, &config_with_ci(), false);
        assert_eq!(plan.statistics().total, 1);
    }

    #[test]
    fn migrate_plans_carry_their_versions_in_the_name() {
        let plan = builder().build_migrate("1.x", "2.x", &config_with_ci());
        assert_eq!(plan.name, "Migration 1.x -> 2.x");
        assert_eq!(plan.statistics().total, 3);
    }
}
