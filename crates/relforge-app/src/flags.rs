//! Non-interactive configuration input.
//!
//! `GenerateFlags` mirrors the command-line surface: simple strings and
//! booleans. Turning it into a `Configuration` parses every enum slug
//! and converts the legacy booleans into their tiered variants.

use relforge_domain::{
    Architecture, CiGenerationLevel, Configuration, ContainerSupport, DomainError, DomainResult,
    ErrorCode, HostingProvider, Platform, ProjectKind, SigningLevel, TriggerKind,
};

/// Raw inputs for the non-interactive `generate` operation.
#[derive(Debug, Clone, Default)]
pub struct GenerateFlags {
    /// Project name (required).
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Binary name; defaults to the project name.
    pub binary: Option<String>,
    /// Entry path; defaults to `.`.
    pub entry_path: Option<String>,
    /// Project kind slug; defaults to `cli`.
    pub project_kind: Option<String>,
    /// Platform slugs; empty means the kind's recommendation.
    pub platforms: Vec<String>,
    /// Architecture slugs; empty means `amd64,arm64`.
    pub architectures: Vec<String>,
    /// Hosting provider slug; defaults to `github`.
    pub hosting_provider: Option<String>,
    /// Legacy flag: enable container build and publish.
    pub container: bool,
    /// Literal registry reference; needed when the provider's default
    /// registry is custom.
    pub registry_url: Option<String>,
    /// Legacy flag: enable basic signing.
    pub signing: bool,
    /// Legacy flag: generate a basic CI workflow.
    pub ci_workflow: bool,
    /// Emit an SBOM block.
    pub emit_sbom: bool,
    /// Emit a Homebrew stub.
    pub homebrew: bool,
    /// Emit a snapcraft stub.
    pub snap: bool,
}

impl GenerateFlags {
    /// Parse the flags into a draft configuration with defaults applied.
    pub fn into_configuration(self) -> DomainResult<Configuration> {
        if self.name.is_empty() {
            return Err(DomainError::new(
                ErrorCode::MissingRequiredField,
                "Project name required",
            )
            .with_details("use --name to specify the project name".to_string())
            .with_context("project_name"));
        }

        let mut config = Configuration::new();
        config.project_name = self.name;
        config.description = self.description.filter(|d| !d.is_empty());

        if let Some(kind) = self.project_kind.as_deref() {
            config.project_kind = kind.parse::<ProjectKind>()?;
        }

        if let Some(binary) = self.binary {
            config.binary_name = binary;
        }
        if let Some(entry) = self.entry_path {
            config.entry_path = entry;
        }

        config.platforms = self
            .platforms
            .iter()
            .map(|p| p.parse::<Platform>())
            .collect::<DomainResult<Vec<_>>>()?;
        config.architectures = self
            .architectures
            .iter()
            .map(|a| a.parse::<Architecture>())
            .collect::<DomainResult<Vec<_>>>()?;

        if let Some(provider) = self.hosting_provider.as_deref() {
            config.hosting_provider = provider.parse::<HostingProvider>()?;
        }

        config.container_support = ContainerSupport::from_bool(self.container);
        if self.container {
            config.container_registry = Some(config.hosting_provider.default_registry());
            config.container_registry_url = self.registry_url.filter(|u| !u.is_empty());
        }
        config.signing_level = SigningLevel::from_bool(self.signing);
        config.ci_generation_level = CiGenerationLevel::from_bool(self.ci_workflow);
        if self.ci_workflow {
            config.triggers = vec![TriggerKind::VersionTags];
        }
        config.emit_sbom = self.emit_sbom;
        config.package_homebrew = self.homebrew;
        config.package_snap = self.snap;

        config.apply_defaults();
        Ok(config)
    }
}
