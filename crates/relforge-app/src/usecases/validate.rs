//! Validation of existing artifacts and project structure.

use tracing::info;

use relforge_domain::{DomainError, ErrorCode};
use relforge_validation::{validate_rendered_artifact, ArtifactKind};

use crate::inspector::ProjectInspector;
use crate::report::Report;

use super::{shielded, UseCaseOptions};

/// Read existing artifacts, check them structurally, and validate the
/// project layout. Never panics across the boundary.
pub async fn validate_workflow(opts: UseCaseOptions) -> Report {
    shielded(validate_inner(opts)).await
}

async fn validate_inner(opts: UseCaseOptions) -> Report {
    let mut report = Report::new();
    info!(dir = %opts.working_dir.display(), "validating release configuration");

    validate_manifest(&opts, &mut report);
    validate_ci_workflow(&opts, &mut report);
    validate_structure(&opts, &mut report);

    report
}

fn validate_manifest(opts: &UseCaseOptions, report: &mut Report) {
    let path = opts.working_dir.join(&opts.settings.manifest_path);

    let exists = match opts.fs.file_exists(&path) {
        Ok(exists) => exists,
        Err(err) => {
            report.add_error(err);
            return;
        }
    };
    if !exists {
        report.add_error(
            DomainError::new(ErrorCode::FileNotFound, "Release manifest not found")
                .with_details(format!("{} does not exist", path.display()))
                .with_context(opts.settings.manifest_path.clone()),
        );
        report.add_recommendation("Run the init operation to create a configuration");
        return;
    }

    let bytes = match opts.fs.read_file(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            report.add_error(err);
            return;
        }
    };
    let content = String::from_utf8_lossy(&bytes);

    if let Err(err) = validate_rendered_artifact(&content, ArtifactKind::Manifest) {
        report.add_error(err.with_context(opts.settings.manifest_path.clone()));
        return;
    }

    let value: serde_yaml::Value = match serde_yaml::from_str(&content) {
        Ok(value) => value,
        Err(parse_err) => {
            report.add_error(
                DomainError::new(ErrorCode::InvalidConfigState, "Manifest is not valid YAML")
                    .with_context(opts.settings.manifest_path.clone())
                    .with_cause(parse_err),
            );
            return;
        }
    };

    // Minimal structural check; the release tool's own grammar is out
    // of scope.
    let has_name = value
        .get("project_name")
        .map(|v| v.is_string())
        .unwrap_or(false);
    let has_builds = value
        .get("builds")
        .map(|v| v.is_sequence())
        .unwrap_or(false);
    if !has_name || !has_builds {
        report.add_error(
            DomainError::new(
                ErrorCode::InvalidConfigState,
                "Manifest is missing required sections",
            )
            .with_details("expected a project_name string and a builds list".to_string())
            .with_context(opts.settings.manifest_path.clone()),
        );
    }
}

fn validate_ci_workflow(opts: &UseCaseOptions, report: &mut Report) {
    let path = opts
        .working_dir
        .join(&opts.settings.workflow_dir)
        .join(&opts.settings.workflow_file);

    let exists = match opts.fs.file_exists(&path) {
        Ok(exists) => exists,
        Err(err) => {
            report.add_warning(err);
            return;
        }
    };
    if !exists {
        report.add_recommendation("Add a CI workflow for automated releases");
        return;
    }

    let bytes = match opts.fs.read_file(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            report.add_error(err);
            return;
        }
    };
    let content = String::from_utf8_lossy(&bytes);

    if let Err(err) = validate_rendered_artifact(&content, ArtifactKind::CiWorkflow) {
        report.add_error(err.with_context(opts.settings.workflow_file.clone()));
        return;
    }

    match serde_yaml::from_str::<serde_yaml::Value>(&content) {
        Ok(value) => {
            let has_triggers = value.get("on").is_some();
            let has_jobs = value.get("jobs").is_some();
            if !has_triggers || !has_jobs {
                report.add_error(
                    DomainError::new(
                        ErrorCode::InvalidConfigState,
                        "Workflow is missing required sections",
                    )
                    .with_details("expected on and jobs sections".to_string())
                    .with_context(opts.settings.workflow_file.clone()),
                );
            }
        }
        Err(parse_err) => {
            report.add_error(
                DomainError::new(ErrorCode::InvalidConfigState, "Workflow is not valid YAML")
                    .with_context(opts.settings.workflow_file.clone())
                    .with_cause(parse_err),
            );
        }
    }
}

fn validate_structure(opts: &UseCaseOptions, report: &mut Report) {
    let inspector = ProjectInspector::new(opts.fs.as_ref(), &opts.working_dir);

    let info = match inspector.inspect() {
        Ok(info) => info,
        Err(err) => {
            report.add_error(err);
            return;
        }
    };

    if !info.has_descriptor {
        report.add_error(
            DomainError::new(ErrorCode::DependencyNotFound, "Module descriptor not found")
                .with_details("the project must have a module descriptor".to_string()),
        );
    }
    if info.entry_file.is_none() {
        report.add_error(
            DomainError::new(ErrorCode::FileNotFound, "Entry file not found")
                .with_details("the project needs an entry file to be buildable".to_string()),
        );
    }

    for recommendation in inspector.recommendations(
        &info,
        &opts.settings.manifest_path,
        &opts.settings.workflow_dir,
    ) {
        report.add_recommendation(recommendation);
    }
}
