//! Interactive configuration through the form-runner port.

use tracing::info;

use relforge_domain::{
    Architecture, CiGenerationLevel, ConfigState, Configuration, ContainerRegistry,
    ContainerSupport, DomainError, DomainResult, ErrorCode, FormOption, FormRunner,
    HostingProvider, Platform, ProjectKind, SigningLevel, TriggerKind,
};
use relforge_validation::{ConfigValidator, ValidatedField};

use crate::report::Report;

use super::{run_generation, shielded, UseCaseOptions};

/// Drive the form runner to fill a configuration, validate it, and run
/// the generation plan. Never panics across the boundary.
pub async fn init_workflow(form: &mut dyn FormRunner, opts: UseCaseOptions) -> Report {
    shielded(init_inner(form, opts)).await
}

async fn init_inner(form: &mut dyn FormRunner, opts: UseCaseOptions) -> Report {
    let mut report = Report::new();

    let mut config = match collect_configuration(form) {
        Ok(config) => config,
        Err(err) => {
            report.add_error(err);
            return report;
        }
    };

    info!(project = %config.project_name, "configuration collected from form");

    let validation = ConfigValidator::new().validate(&config);
    for warning in validation.warnings {
        report.add_warning(warning);
    }

    if !validation.ok {
        for error in validation.errors {
            report.add_error(error);
        }
        let _ = config.transition_to(ConfigState::Invalid);
        report.final_state = Some(config.state());
        return report;
    }

    if let Err(err) = config.transition_to(ConfigState::Valid) {
        report.add_error(err);
        report.final_state = Some(config.state());
        return report;
    }

    run_generation(&mut config, &opts, &mut report).await;
    report
}

/// A field validator that accepts the empty string, for fields whose
/// empty answer means "use the default".
fn optional(
    inner: impl Fn(&str) -> Result<(), DomainError> + Send + Sync,
) -> impl Fn(&str) -> Result<(), DomainError> + Send + Sync {
    move |value| {
        if value.is_empty() {
            Ok(())
        } else {
            inner(value)
        }
    }
}

fn selection_error(what: &str) -> DomainError {
    DomainError::new(ErrorCode::MissingRequiredField, "Invalid selection")
        .with_context(what.to_string())
}

fn collect_configuration(form: &mut dyn FormRunner) -> DomainResult<Configuration> {
    let mut config = Configuration::new();

    let name_validator = ConfigValidator::field_validator(ValidatedField::ProjectName);
    config.project_name = form.ask_string("Project name", "my-project", &name_validator)?;

    let description_validator =
        optional(ConfigValidator::field_validator(ValidatedField::Description));
    let description = form.ask_string(
        "Project description",
        "A short description",
        &description_validator,
    )?;
    config.description = Some(description).filter(|d| !d.is_empty());

    let kind_options: Vec<FormOption> = ProjectKind::ALL
        .iter()
        .map(|k| FormOption::new(k.slug(), k.display_name()))
        .collect();
    let kind_index = form.ask_select("Project kind", &kind_options)?;
    config.project_kind = *ProjectKind::ALL
        .get(kind_index)
        .ok_or_else(|| selection_error("project_kind"))?;

    let binary_validator =
        optional(ConfigValidator::field_validator(ValidatedField::BinaryName));
    config.binary_name = form.ask_string(
        "Binary name",
        config.project_kind.default_binary_name(),
        &binary_validator,
    )?;

    let entry_validator =
        optional(ConfigValidator::field_validator(ValidatedField::EntryPath));
    let entry = form.ask_string("Entry path", ".", &entry_validator)?;
    if !entry.is_empty() {
        config.entry_path = entry;
    }

    let platform_options: Vec<FormOption> = Platform::ALL
        .iter()
        .map(|p| FormOption::new(p.slug(), p.display_name()))
        .collect();
    config.platforms = form
        .ask_multi_select("Target platforms", &platform_options, 1)?
        .into_iter()
        .map(|i| {
            Platform::ALL
                .get(i)
                .copied()
                .ok_or_else(|| selection_error("platforms"))
        })
        .collect::<DomainResult<Vec<_>>>()?;

    let architecture_options: Vec<FormOption> = Architecture::ALL
        .iter()
        .map(|a| FormOption::new(a.slug(), a.display_name()))
        .collect();
    config.architectures = form
        .ask_multi_select("Target architectures", &architecture_options, 1)?
        .into_iter()
        .map(|i| {
            Architecture::ALL
                .get(i)
                .copied()
                .ok_or_else(|| selection_error("architectures"))
        })
        .collect::<DomainResult<Vec<_>>>()?;

    let provider_options: Vec<FormOption> = HostingProvider::ALL
        .iter()
        .map(|p| FormOption::new(p.slug(), p.display_name()))
        .collect();
    let provider_index = form.ask_select("Hosting provider", &provider_options)?;
    config.hosting_provider = *HostingProvider::ALL
        .get(provider_index)
        .ok_or_else(|| selection_error("hosting_provider"))?;

    let container_default = config.project_kind.container_build_supported();
    if form.ask_confirm("Build container images?", container_default)? {
        config.container_support = ContainerSupport::BuildAndPublish;

        // Providers without a hosted registry need a literal reference.
        if config.hosting_provider.default_registry() == ContainerRegistry::Custom {
            let registry_validator =
                ConfigValidator::field_validator(ValidatedField::RegistryUrl);
            let url = form.ask_string(
                "Container registry",
                "registry.example.com/team",
                &registry_validator,
            )?;
            config.container_registry_url = Some(url);
        }
    }

    config.signing_level =
        SigningLevel::from_bool(form.ask_confirm("Sign release artifacts?", false)?);

    let ci_default = config.hosting_provider.ci_supported();
    if form.ask_confirm("Generate a CI release workflow?", ci_default)? {
        config.ci_generation_level = CiGenerationLevel::Basic;

        let trigger_options: Vec<FormOption> = TriggerKind::ALL
            .iter()
            .map(|t| FormOption::new(t.slug(), t.display_name()))
            .collect();
        config.triggers = form
            .ask_multi_select("Workflow triggers", &trigger_options, 1)?
            .into_iter()
            .map(|i| {
                TriggerKind::ALL
                    .get(i)
                    .copied()
                    .ok_or_else(|| selection_error("triggers"))
            })
            .collect::<DomainResult<Vec<_>>>()?;
    }

    config.emit_sbom = form.ask_confirm("Emit a software bill of materials?", false)?;

    config.apply_defaults();
    Ok(config)
}
