//! Concrete jobs for the generation plan.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use relforge_domain::{
    Configuration, DomainError, DomainResult, ErrorCode, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE,
};
use relforge_emitters::{emit_manifest, emit_workflow};
use relforge_validation::{validate_rendered_artifact, ArtifactKind};

use crate::job::{Job, JobContext};

/// Name of the module descriptor a project must carry.
pub const MODULE_DESCRIPTOR: &str = "go.mod";

/// Name of the build entry file.
pub const ENTRY_FILE: &str = "main.go";

/// Suffix of the single-slot backup written before an overwrite.
pub const BACKUP_SUFFIX: &str = ".backup";

fn backup_path(target: &std::path::Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(BACKUP_SUFFIX);
    target.with_file_name(name)
}

/// Read-only check that the working directory looks like a buildable
/// project: the module descriptor exists and an entry file is present at
/// the top level or under `cmd/*/`.
pub struct ProjectValidationJob;

#[async_trait]
impl Job for ProjectValidationJob {
    fn id(&self) -> &str {
        "project-validation"
    }

    fn name(&self) -> &str {
        "Validate Project Structure"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;
        info!("validating project structure");

        let descriptor = ctx.path(MODULE_DESCRIPTOR);
        if !ctx.fs.file_exists(&descriptor)? {
            return Err(DomainError::new(
                ErrorCode::FileNotFound,
                "Module descriptor not found",
            )
            .with_details(format!("{MODULE_DESCRIPTOR} is required in the project root"))
            .with_context(MODULE_DESCRIPTOR.to_string()));
        }

        if !self.entry_file_present(ctx)? {
            return Err(DomainError::new(ErrorCode::FileNotFound, "Entry file not found")
                .with_details(format!(
                    "expected {ENTRY_FILE} at the project root or under cmd/*/"
                ))
                .with_context(ENTRY_FILE.to_string()));
        }

        info!("project structure looks buildable");
        Ok(())
    }

    async fn rollback(&self, _ctx: &JobContext) -> DomainResult<()> {
        // Read-only job; nothing to undo.
        Ok(())
    }
}

impl ProjectValidationJob {
    fn entry_file_present(&self, ctx: &JobContext) -> DomainResult<bool> {
        if ctx.fs.file_exists(&ctx.path(ENTRY_FILE))? {
            return Ok(true);
        }

        let cmd_dir = ctx.path("cmd");
        if !ctx.fs.dir_exists(&cmd_dir)? {
            return Ok(false);
        }
        for entry in ctx.fs.list_dir(&cmd_dir)? {
            if ctx.fs.dir_exists(&entry)? && ctx.fs.file_exists(&entry.join(ENTRY_FILE))? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// One tool the dependency check looks for on `PATH`.
#[derive(Debug, Clone)]
pub struct RequiredTool {
    /// Executable name.
    pub tool: String,
    /// Whether its absence halts the plan.
    pub fatal: bool,
}

/// Verifies required tools are on `PATH`. Missing non-fatal tools are
/// logged as warnings; a missing fatal tool fails the job.
pub struct DependencyCheckJob {
    required: Vec<RequiredTool>,
}

impl DependencyCheckJob {
    /// Check for an explicit tool list.
    pub fn new(required: Vec<RequiredTool>) -> Self {
        Self { required }
    }

    /// The tool set a configuration needs: the toolchain always (fatal),
    /// a container engine when containers are enabled, and cosign when
    /// signing is on (both advisory).
    pub fn for_config(config: &Configuration) -> Self {
        let mut required = vec![RequiredTool {
            tool: "go".to_string(),
            fatal: true,
        }];
        if config.container_support.is_enabled() {
            required.push(RequiredTool {
                tool: "docker".to_string(),
                fatal: false,
            });
        }
        if config.signing_level.is_enabled() {
            required.push(RequiredTool {
                tool: "cosign".to_string(),
                fatal: false,
            });
        }
        Self { required }
    }

    fn find_on_path(tool: &str) -> Option<PathBuf> {
        let path = std::env::var_os("PATH")?;
        for dir in std::env::split_paths(&path) {
            let candidate = dir.join(tool);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

#[async_trait]
impl Job for DependencyCheckJob {
    fn id(&self) -> &str {
        "dependency-check"
    }

    fn name(&self) -> &str {
        "Check Dependencies"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;
        info!("checking dependencies");

        for required in &self.required {
            match Self::find_on_path(&required.tool) {
                Some(found) => {
                    debug!(tool = %required.tool, path = %found.display(), "dependency found");
                }
                None if required.fatal => {
                    return Err(DomainError::new(
                        ErrorCode::DependencyNotFound,
                        "Required tool not found",
                    )
                    .with_details(format!("'{}' is not on PATH", required.tool))
                    .with_context(required.tool.clone()));
                }
                None => {
                    warn!(tool = %required.tool, "optional dependency not found");
                }
            }
        }

        Ok(())
    }

    async fn rollback(&self, _ctx: &JobContext) -> DomainResult<()> {
        // Read-only job; nothing to undo.
        Ok(())
    }
}

#[derive(Default)]
struct WriteState {
    wrote: bool,
    backup: Option<PathBuf>,
    created_dirs: Vec<PathBuf>,
}

/// Renders the release manifest and writes it to the target path.
///
/// If the target exists and `force` is off the job fails with
/// `ConfigurationExists` before touching anything. With `force`, the
/// existing file is first renamed into the single `.backup` slot, so a
/// repeated forced run always keeps the just-previous contents.
pub struct ManifestGenerationJob {
    config: Configuration,
    manifest_path: PathBuf,
    force: bool,
    state: Mutex<WriteState>,
}

impl ManifestGenerationJob {
    /// Create the job; `manifest_path` is relative to the working dir.
    pub fn new(config: Configuration, manifest_path: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            config,
            manifest_path: manifest_path.into(),
            force,
            state: Mutex::new(WriteState::default()),
        }
    }
}

#[async_trait]
impl Job for ManifestGenerationJob {
    fn id(&self) -> &str {
        "manifest-generation"
    }

    fn name(&self) -> &str {
        "Generate Release Manifest"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;
        let target = ctx.path(&self.manifest_path);
        info!(path = %target.display(), "generating release manifest");

        let content = emit_manifest(&self.config);
        validate_rendered_artifact(&content, ArtifactKind::Manifest)?;

        if ctx.fs.file_exists(&target)? {
            if !self.force {
                return Err(DomainError::new(
                    ErrorCode::ConfigurationExists,
                    "Configuration already exists",
                )
                .with_details(format!("{} already exists", target.display()))
                .with_context(self.manifest_path.display().to_string()));
            }

            let backup = backup_path(&target);
            ctx.fs.rename(&target, &backup)?;
            self.state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .backup = Some(backup);
        }

        ctx.fs
            .write_file(&target, content.as_bytes(), DEFAULT_FILE_MODE)?;
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .wrote = true;

        info!("release manifest generated");
        Ok(())
    }

    async fn rollback(&self, ctx: &JobContext) -> DomainResult<()> {
        let (wrote, backup) = {
            let state = self
                .state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            (state.wrote, state.backup.clone())
        };

        let target = ctx.path(&self.manifest_path);
        match backup {
            Some(backup) => {
                info!(path = %target.display(), "restoring manifest backup");
                ctx.fs.rename(&backup, &target)?;
            }
            None if wrote => {
                info!(path = %target.display(), "removing generated manifest");
                ctx.fs.remove_file(&target)?;
            }
            None => {
                // Nothing was written; leave the filesystem untouched.
            }
        }
        Ok(())
    }
}

/// Renders the CI workflow and writes it under the workflow directory,
/// creating missing path components. Overwrite semantics match the
/// manifest job: `ConfigurationExists` without `force`, single-slot
/// backup with it.
pub struct CiWorkflowGenerationJob {
    config: Configuration,
    workflow_dir: PathBuf,
    workflow_file: String,
    force: bool,
    state: Mutex<WriteState>,
}

impl CiWorkflowGenerationJob {
    /// Create the job; `workflow_dir` is relative to the working dir.
    pub fn new(
        config: Configuration,
        workflow_dir: impl Into<PathBuf>,
        workflow_file: impl Into<String>,
        force: bool,
    ) -> Self {
        Self {
            config,
            workflow_dir: workflow_dir.into(),
            workflow_file: workflow_file.into(),
            force,
            state: Mutex::new(WriteState::default()),
        }
    }

    fn target(&self, ctx: &JobContext) -> PathBuf {
        ctx.path(&self.workflow_dir).join(&self.workflow_file)
    }
}

#[async_trait]
impl Job for CiWorkflowGenerationJob {
    fn id(&self) -> &str {
        "workflow-generation"
    }

    fn name(&self) -> &str {
        "Generate CI Workflow"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;
        let target = self.target(ctx);
        info!(path = %target.display(), "generating CI workflow");

        let content = emit_workflow(&self.config);
        validate_rendered_artifact(&content, ArtifactKind::CiWorkflow)?;

        // Remember which path components we create so rollback can
        // remove them again, innermost last.
        let mut created = Vec::new();
        let mut dir = PathBuf::new();
        for component in ctx.path(&self.workflow_dir).components() {
            dir.push(component);
            if !ctx.fs.dir_exists(&dir)? {
                created.push(dir.clone());
            }
        }
        if !created.is_empty() {
            ctx.fs
                .mkdir_all(&ctx.path(&self.workflow_dir), DEFAULT_DIR_MODE)?;
        }

        if ctx.fs.file_exists(&target)? {
            if !self.force {
                return Err(DomainError::new(
                    ErrorCode::ConfigurationExists,
                    "Workflow already exists",
                )
                .with_details(format!("{} already exists", target.display()))
                .with_context(self.workflow_file.clone()));
            }

            let backup = backup_path(&target);
            ctx.fs.rename(&target, &backup)?;
            self.state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .backup = Some(backup);
        }

        ctx.fs
            .write_file(&target, content.as_bytes(), DEFAULT_FILE_MODE)?;
        {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            state.wrote = true;
            state.created_dirs = created;
        }

        info!("CI workflow generated");
        Ok(())
    }

    async fn rollback(&self, ctx: &JobContext) -> DomainResult<()> {
        let (wrote, backup, created_dirs) = {
            let state = self
                .state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            (state.wrote, state.backup.clone(), state.created_dirs.clone())
        };

        let target = self.target(ctx);
        match backup {
            Some(backup) => {
                info!(path = %target.display(), "restoring workflow backup");
                ctx.fs.rename(&backup, &target)?;
            }
            None if wrote => {
                info!(path = %target.display(), "removing generated workflow");
                ctx.fs.remove_file(&target)?;
            }
            None => {}
        }

        // Remove directories this run created, innermost first, only if
        // they are empty by now.
        for dir in created_dirs.iter().rev() {
            match ctx.fs.list_dir(dir) {
                Ok(entries) if entries.is_empty() => {
                    if let Err(err) = ctx.fs.remove_dir(dir) {
                        debug!(dir = %dir.display(), error = %err, "could not remove directory");
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}
