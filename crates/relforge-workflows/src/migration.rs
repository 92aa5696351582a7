//! Jobs for the migration and update plans.
//!
//! Migration snapshots use timestamped backups
//! (`<name>.backup.<YYYYMMDD-HHMMSS>`), unlike the single-slot backups
//! written on forced overwrite. Snapshots are kept after rollback.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use relforge_domain::{
    Configuration, DomainError, DomainResult, ErrorCode, DEFAULT_FILE_MODE,
};
use relforge_emitters::emit_manifest;
use relforge_validation::{validate_rendered_artifact, ArtifactKind};

use crate::job::{Job, JobContext};
use crate::jobs::BACKUP_SUFFIX;

/// Copies the current manifest into a timestamped backup before a
/// migration touches it. Missing manifests are fine: there is nothing
/// to snapshot.
pub struct ConfigBackupJob {
    manifest_path: PathBuf,
    snapshot: Mutex<Option<PathBuf>>,
}

impl ConfigBackupJob {
    /// Create the job; `manifest_path` is relative to the working dir.
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            snapshot: Mutex::new(None),
        }
    }

    /// Path of the snapshot written by the last execution, if any.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Job for ConfigBackupJob {
    fn id(&self) -> &str {
        "config-backup"
    }

    fn name(&self) -> &str {
        "Backup Configuration"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;
        let source = ctx.path(&self.manifest_path);

        if !ctx.fs.file_exists(&source)? {
            info!("no existing configuration to back up");
            return Ok(());
        }

        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        let backup = ctx.path(format!(
            "{}{}.{}",
            self.manifest_path.display(),
            BACKUP_SUFFIX,
            stamp
        ));

        let bytes = ctx.fs.read_file(&source)?;
        ctx.fs.write_file(&backup, &bytes, DEFAULT_FILE_MODE)?;
        info!(backup = %backup.display(), "configuration backed up");

        *self
            .snapshot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(backup);
        Ok(())
    }

    async fn rollback(&self, _ctx: &JobContext) -> DomainResult<()> {
        // Snapshots are kept; they are the safety net, not a side effect.
        Ok(())
    }
}

/// Checks that a migration between two tool versions makes sense.
pub struct MigrationValidationJob {
    from_version: String,
    to_version: String,
}

impl MigrationValidationJob {
    /// Create the job for a `from -> to` migration.
    pub fn new(from_version: impl Into<String>, to_version: impl Into<String>) -> Self {
        Self {
            from_version: from_version.into(),
            to_version: to_version.into(),
        }
    }
}

#[async_trait]
impl Job for MigrationValidationJob {
    fn id(&self) -> &str {
        "migration-validation"
    }

    fn name(&self) -> &str {
        "Validate Migration Compatibility"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;
        info!(from = %self.from_version, to = %self.to_version, "validating migration");

        if self.from_version == self.to_version {
            return Err(DomainError::new(
                ErrorCode::JobFailed,
                "Source and target versions are the same",
            )
            .with_details(format!("both are '{}'", self.from_version)));
        }

        Ok(())
    }

    async fn rollback(&self, _ctx: &JobContext) -> DomainResult<()> {
        // Read-only job; nothing to undo.
        Ok(())
    }
}

/// Re-renders the manifest for the target tool version. Rollback
/// restores the most recent timestamped snapshot.
pub struct ConfigMigrationJob {
    config: Configuration,
    manifest_path: PathBuf,
}

impl ConfigMigrationJob {
    /// Create the job; `manifest_path` is relative to the working dir.
    pub fn new(config: Configuration, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            manifest_path: manifest_path.into(),
        }
    }

    fn latest_snapshot(&self, ctx: &JobContext) -> DomainResult<Option<PathBuf>> {
        let target = ctx.path(&self.manifest_path);
        let dir = target
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| ctx.working_dir.clone());
        let prefix = format!(
            "{}{}.",
            target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            BACKUP_SUFFIX
        );

        let mut snapshots: Vec<PathBuf> = ctx
            .fs
            .list_dir(&dir)?
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();
        // Timestamps sort lexicographically, so the last one is newest.
        snapshots.sort();
        Ok(snapshots.pop())
    }
}

#[async_trait]
impl Job for ConfigMigrationJob {
    fn id(&self) -> &str {
        "config-migration"
    }

    fn name(&self) -> &str {
        "Migrate Configuration"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;
        info!("migrating configuration");

        let content = emit_manifest(&self.config);
        validate_rendered_artifact(&content, ArtifactKind::Manifest)?;
        ctx.fs.write_file(
            &ctx.path(&self.manifest_path),
            content.as_bytes(),
            DEFAULT_FILE_MODE,
        )?;

        info!("configuration migrated");
        Ok(())
    }

    async fn rollback(&self, ctx: &JobContext) -> DomainResult<()> {
        let Some(snapshot) = self.latest_snapshot(ctx)? else {
            return Err(DomainError::new(
                ErrorCode::RollbackFailed,
                "No snapshot found for rollback",
            )
            .with_context(self.manifest_path.display().to_string()));
        };

        info!(snapshot = %snapshot.display(), "restoring configuration snapshot");
        let bytes = ctx.fs.read_file(&snapshot)?;
        ctx.fs.write_file(
            &ctx.path(&self.manifest_path),
            &bytes,
            DEFAULT_FILE_MODE,
        )?;
        Ok(())
    }
}

/// Re-renders the manifest in place; in dry-run mode it only reports
/// what would change.
pub struct ConfigUpdateJob {
    config: Configuration,
    manifest_path: PathBuf,
    dry_run: bool,
}

impl ConfigUpdateJob {
    /// Create the job; `manifest_path` is relative to the working dir.
    pub fn new(config: Configuration, manifest_path: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            config,
            manifest_path: manifest_path.into(),
            dry_run,
        }
    }
}

#[async_trait]
impl Job for ConfigUpdateJob {
    fn id(&self) -> &str {
        "config-update"
    }

    fn name(&self) -> &str {
        "Update Configuration"
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        ctx.check_cancelled()?;

        let content = emit_manifest(&self.config);
        validate_rendered_artifact(&content, ArtifactKind::Manifest)?;

        if self.dry_run {
            let target = ctx.path(&self.manifest_path);
            let changed = match ctx.fs.file_exists(&target)? {
                true => ctx.fs.read_file(&target)? != content.as_bytes(),
                false => true,
            };
            info!(changed, "dry run: configuration not written");
            return Ok(());
        }

        info!("updating configuration");
        ctx.fs.write_file(
            &ctx.path(&self.manifest_path),
            content.as_bytes(),
            DEFAULT_FILE_MODE,
        )?;
        Ok(())
    }

    async fn rollback(&self, _ctx: &JobContext) -> DomainResult<()> {
        // Updates are only run after a snapshot; restoring it is the
        // migration job's duty.
        Ok(())
    }
}
