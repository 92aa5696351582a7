//! Host-tunable settings.
//!
//! Artifact locations and plan timeouts load from an optional
//! `relforge.toml` plus `APP_WIZARD_*` environment overrides. Nothing
//! here ever influences emitter output; these settings only decide
//! where artifacts land and how long plans may run.

use serde::{Deserialize, Serialize};

use relforge_domain::{DomainError, DomainResult, ErrorCode};

/// Environment prefix for overrides, e.g. `APP_WIZARD_MANIFEST_PATH`.
pub const ENV_PREFIX: &str = "APP_WIZARD";

/// Tunable defaults for the use-case layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Manifest filename, relative to the working directory.
    pub manifest_path: String,
    /// Workflow directory, relative to the working directory.
    pub workflow_dir: String,
    /// Workflow filename within the workflow directory.
    pub workflow_file: String,
    /// Whole-plan timeout in seconds.
    pub plan_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_path: ".releaser.yaml".to_string(),
            workflow_dir: ".ci/workflows".to_string(),
            workflow_file: "release.yml".to_string(),
            plan_timeout_secs: 60 * 60,
        }
    }
}

impl Settings {
    /// Load settings from `relforge.toml` (optional) and the
    /// environment.
    pub fn load() -> DomainResult<Self> {
        let defaults = Settings::default();
        let loaded = config::Config::builder()
            .set_default("manifest_path", defaults.manifest_path.as_str())
            .and_then(|b| b.set_default("workflow_dir", defaults.workflow_dir.as_str()))
            .and_then(|b| b.set_default("workflow_file", defaults.workflow_file.as_str()))
            .and_then(|b| b.set_default("plan_timeout_secs", defaults.plan_timeout_secs))
            .map_err(|e| {
                DomainError::new(ErrorCode::FileReadFailed, "Failed to assemble settings")
                    .with_cause(e)
            })?
            .add_source(config::File::with_name("relforge").required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| {
                DomainError::new(ErrorCode::FileReadFailed, "Failed to load settings")
                    .with_cause(e)
            })?;

        loaded.try_deserialize().map_err(|e| {
            DomainError::new(ErrorCode::FileReadFailed, "Invalid settings")
                .with_cause(e)
        })
    }

    /// Plan timeout as a duration.
    pub fn plan_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.plan_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_conventional_paths() {
        let settings = Settings::default();
        assert_eq!(settings.manifest_path, ".releaser.yaml");
        assert_eq!(settings.workflow_dir, ".ci/workflows");
        assert_eq!(settings.workflow_file, "release.yml");
        assert_eq!(settings.plan_timeout(), std::time::Duration::from_secs(3600));
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.workflow_file, "release.yml");
    }
}
