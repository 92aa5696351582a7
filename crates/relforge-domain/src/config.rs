//! The `Configuration` aggregate.

use serde::{Deserialize, Serialize};

use crate::architecture::Architecture;
use crate::build_flag::BuildFlag;
use crate::error::{DomainError, DomainResult, ErrorCode};
use crate::hosting_provider::HostingProvider;
use crate::levels::{
    CiGenerationLevel, ContainerSupport, FeatureTier, NativeCompilation, SigningLevel,
};
use crate::platform::Platform;
use crate::project_kind::ProjectKind;
use crate::registry::ContainerRegistry;
use crate::state::ConfigState;
use crate::trigger::TriggerKind;

/// The single source of truth for what to release and how.
///
/// The aggregate exclusively owns its collections; validators and
/// emitters receive immutable borrows. Equality is structural over all
/// fields. The lifecycle `state` is private so every change goes through
/// [`Configuration::transition_to`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    // Identity
    /// Project name.
    pub project_name: String,
    /// Optional one-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind of project being released.
    pub project_kind: ProjectKind,
    /// Name of the produced binary.
    pub binary_name: String,
    /// Relative path to the build entry point.
    pub entry_path: String,

    // Build
    /// Target platforms; non-empty once validated.
    pub platforms: Vec<Platform>,
    /// Target architectures; non-empty once validated.
    pub architectures: Vec<Architecture>,
    /// Native compilation setting.
    pub native_compilation: NativeCompilation,
    /// Build flags; at most ten, unique by name.
    #[serde(default)]
    pub build_flags: Vec<BuildFlag>,
    /// Whether version information is injected at link time.
    pub inject_version_info: bool,

    // Release
    /// Where releases are published.
    pub hosting_provider: HostingProvider,
    /// Container build/publish involvement.
    pub container_support: ContainerSupport,
    /// Registry to push images to; `None` until defaulted or chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_registry: Option<ContainerRegistry>,
    /// Literal registry reference; required for custom registries and
    /// checked against the registry's URL pattern otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_registry_url: Option<String>,
    /// Image name; defaults to the lowercased project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_image: Option<String>,
    /// Artifact signing level.
    pub signing_level: SigningLevel,
    /// Whether a Homebrew formula stub is emitted.
    pub package_homebrew: bool,
    /// Whether a snapcraft stub is emitted.
    pub package_snap: bool,
    /// Whether an SBOM block is emitted.
    pub emit_sbom: bool,

    // CI
    /// How much CI workflow to generate.
    pub ci_generation_level: CiGenerationLevel,
    /// Selected workflow triggers.
    #[serde(default)]
    pub triggers: Vec<TriggerKind>,

    // Lifecycle
    /// Feature tier.
    pub feature_tier: FeatureTier,
    /// Lifecycle state; mutate only through `transition_to`.
    state: ConfigState,
}

impl Configuration {
    /// Create a draft configuration with conservative defaults.
    pub fn new() -> Self {
        Self {
            project_name: String::new(),
            description: None,
            project_kind: ProjectKind::Cli,
            binary_name: String::new(),
            entry_path: ".".to_string(),
            platforms: Vec::new(),
            architectures: Vec::new(),
            native_compilation: NativeCompilation::Disabled,
            build_flags: Vec::new(),
            inject_version_info: true,
            hosting_provider: HostingProvider::GitHub,
            container_support: ContainerSupport::None,
            container_registry: None,
            container_registry_url: None,
            container_image: None,
            signing_level: SigningLevel::None,
            package_homebrew: false,
            package_snap: false,
            emit_sbom: false,
            ci_generation_level: CiGenerationLevel::None,
            triggers: Vec::new(),
            feature_tier: FeatureTier::Basic,
            state: ConfigState::Draft,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConfigState {
        self.state
    }

    /// Transition to `next`, failing with `InvalidStateTransition` when
    /// `(current, next)` is not an edge. The aggregate is untouched on
    /// failure.
    pub fn transition_to(&mut self, next: ConfigState) -> DomainResult<()> {
        if !self.state.allows_transition_to(next) {
            return Err(
                DomainError::new(ErrorCode::InvalidStateTransition, "Invalid state transition")
                    .with_details(format!("{} -> {next}", self.state)),
            );
        }
        self.state = next;
        Ok(())
    }

    /// Fill unset fields from the project kind and provider capability
    /// tables. Idempotent: a second call changes nothing.
    pub fn apply_defaults(&mut self) {
        if self.native_compilation == NativeCompilation::Disabled
            && self.project_kind.default_native_compilation()
        {
            self.native_compilation = NativeCompilation::Enabled;
        }

        if self.platforms.is_empty() {
            self.platforms = self.project_kind.recommended_platforms().to_vec();
        }

        if self.architectures.is_empty() {
            self.architectures = Architecture::recommended();
        }

        if self.container_support.is_enabled() && self.container_registry.is_none() {
            self.container_registry = Some(self.hosting_provider.default_registry());
        }

        if self.ci_generation_level.is_enabled() && self.triggers.is_empty() {
            self.triggers = TriggerKind::recommended_triggers(self.project_kind);
        }

        if self.binary_name.is_empty() && !self.project_name.is_empty() {
            self.binary_name = self.project_name.clone();
        }

        let image_unset = self
            .container_image
            .as_deref()
            .map(str::is_empty)
            .unwrap_or(true);
        if image_unset && self.container_support.is_enabled() && !self.project_name.is_empty() {
            self.container_image = Some(self.project_name.to_lowercase());
        }
    }

    /// The image name used in emitted container templates.
    pub fn effective_image_name(&self) -> String {
        match self.container_image.as_deref() {
            Some(image) if !image.is_empty() => image.to_string(),
            _ => self.project_name.to_lowercase(),
        }
    }

    /// The registry used for emission, falling back to the provider default.
    pub fn effective_registry(&self) -> ContainerRegistry {
        self.container_registry
            .unwrap_or_else(|| self.hosting_provider.default_registry())
    }

    /// Whether the aggregate is in a state and shape that permits
    /// artifact generation.
    pub fn is_ready_for_generation(&self) -> bool {
        self.state.allows_generation()
            && !self.project_name.is_empty()
            && !self.binary_name.is_empty()
            && !self.platforms.is_empty()
            && !self.architectures.is_empty()
    }

    /// Whether container artifacts should be emitted.
    pub fn should_emit_containers(&self) -> bool {
        self.container_support.is_enabled() && self.project_kind.container_build_supported()
    }

    /// Whether a CI workflow should be emitted.
    pub fn should_emit_workflow(&self) -> bool {
        self.ci_generation_level.is_enabled()
            && self.hosting_provider.ci_supported()
            && !self.triggers.is_empty()
    }

    /// Selected platforms, deduplicated, in enum declaration order.
    pub fn ordered_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .iter()
            .copied()
            .filter(|p| self.platforms.contains(p))
            .collect()
    }

    /// Selected architectures, deduplicated, in enum declaration order.
    pub fn ordered_architectures(&self) -> Vec<Architecture> {
        Architecture::ALL
            .iter()
            .copied()
            .filter(|a| self.architectures.contains(a))
            .collect()
    }

    /// Selected triggers, deduplicated, in enum declaration order.
    pub fn ordered_triggers(&self) -> Vec<TriggerKind> {
        TriggerKind::ALL
            .iter()
            .copied()
            .filter(|t| self.triggers.contains(t))
            .collect()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_cli(name: &str) -> Configuration {
        let mut config = Configuration::new();
        config.project_name = name.to_string();
        config
    }

    #[test]
    fn new_configurations_start_as_drafts() {
        let config = Configuration::new();
        assert_eq!(config.state(), ConfigState::Draft);
        assert!(config.inject_version_info);
    }

    #[test]
    fn defaults_fill_platforms_and_binary_name() {
        let mut config = draft_cli("my-tool");
        config.apply_defaults();
        assert_eq!(config.binary_name, "my-tool");
        assert_eq!(
            config.platforms,
            vec![Platform::Linux, Platform::Darwin, Platform::Windows]
        );
        assert_eq!(
            config.architectures,
            vec![Architecture::Amd64, Architecture::Arm64]
        );
    }

    #[test]
    fn defaults_do_not_overwrite_choices() {
        let mut config = draft_cli("my-tool");
        config.binary_name = "tool".to_string();
        config.platforms = vec![Platform::Linux];
        config.apply_defaults();
        assert_eq!(config.binary_name, "tool");
        assert_eq!(config.platforms, vec![Platform::Linux]);
    }

    #[test]
    fn container_defaults_follow_the_provider() {
        let mut config = draft_cli("My-Service");
        config.container_support = ContainerSupport::BuildAndPublish;
        config.apply_defaults();
        assert_eq!(config.container_registry, Some(ContainerRegistry::Ghcr));
        assert_eq!(config.container_image.as_deref(), Some("my-service"));
    }

    #[test]
    fn web_service_upgrades_native_compilation() {
        let mut config = draft_cli("web");
        config.project_kind = ProjectKind::WebService;
        config.apply_defaults();
        assert_eq!(config.native_compilation, NativeCompilation::Enabled);
    }

    #[test]
    fn invalid_transition_leaves_state_untouched() {
        let mut config = draft_cli("x");
        let err = config.transition_to(ConfigState::Generated).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(config.state(), ConfigState::Draft);
    }

    #[test]
    fn full_lifecycle_walk() {
        let mut config = draft_cli("x");
        config.transition_to(ConfigState::Valid).unwrap();
        config.transition_to(ConfigState::Processing).unwrap();
        config.transition_to(ConfigState::Generated).unwrap();
        assert!(config.transition_to(ConfigState::Draft).is_err());
    }

    #[test]
    fn ordering_helpers_ignore_input_order_and_duplicates() {
        let mut config = draft_cli("x");
        config.platforms = vec![Platform::Windows, Platform::Linux, Platform::Windows];
        config.architectures = vec![
            Architecture::Arm64,
            Architecture::Amd64,
            Architecture::Arm64,
        ];
        assert_eq!(
            config.ordered_platforms(),
            vec![Platform::Linux, Platform::Windows]
        );
        assert_eq!(
            config.ordered_architectures(),
            vec![Architecture::Amd64, Architecture::Arm64]
        );
    }

    #[test]
    fn clone_is_deep_and_structurally_equal() {
        let mut config = draft_cli("clone-me");
        config.build_flags.push(BuildFlag::new("netgo", ""));
        config.apply_defaults();
        let copy = config.clone();
        assert_eq!(config, copy);
    }

    #[test]
    fn workflow_emission_requires_provider_ci() {
        let mut config = draft_cli("x");
        config.ci_generation_level = CiGenerationLevel::Basic;
        config.triggers = vec![TriggerKind::VersionTags];
        config.hosting_provider = HostingProvider::Gitea;
        assert!(!config.should_emit_workflow());
        config.hosting_provider = HostingProvider::GitHub;
        assert!(config.should_emit_workflow());
    }
}
