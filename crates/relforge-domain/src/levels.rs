//! Tiered settings that replace what were once plain booleans.
//!
//! Each of these concepts has more than two meaningful values, so each is
//! a closed variant set. The `from_bool`/`is_enabled` pairs exist only as
//! interop helpers for callers still speaking the legacy boolean flags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::project_kind::ProjectKind;

/// Native (FFI-linked) compilation setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NativeCompilation {
    /// Native compilation is off.
    #[default]
    Disabled,
    /// Native compilation is on when available.
    Enabled,
    /// Native compilation is mandatory; builds fail without it.
    Required,
}

impl NativeCompilation {
    /// Whether native compilation is on (enabled or required).
    pub fn is_enabled(&self) -> bool {
        !matches!(self, NativeCompilation::Disabled)
    }

    /// Whether native compilation is mandatory.
    pub fn is_required(&self) -> bool {
        matches!(self, NativeCompilation::Required)
    }

    /// Legacy boolean interop.
    pub fn from_bool(enabled: bool) -> Self {
        if enabled {
            NativeCompilation::Enabled
        } else {
            NativeCompilation::Disabled
        }
    }

    /// The `0`/`1` value written into build environment blocks.
    pub fn env_value(&self) -> &'static str {
        if self.is_enabled() {
            "1"
        } else {
            "0"
        }
    }
}

impl fmt::Display for NativeCompilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NativeCompilation::Disabled => "Disabled",
            NativeCompilation::Enabled => "Enabled",
            NativeCompilation::Required => "Required",
        })
    }
}

/// Container build/publish support level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerSupport {
    /// No container involvement.
    #[default]
    None,
    /// Build images locally, never publish.
    BuildOnly,
    /// Publish pre-built images only.
    PublishOnly,
    /// Build and publish.
    BuildAndPublish,
}

impl ContainerSupport {
    /// Whether any container involvement is configured.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ContainerSupport::None)
    }

    /// Whether images should be built.
    pub fn should_build(&self) -> bool {
        matches!(
            self,
            ContainerSupport::BuildOnly | ContainerSupport::BuildAndPublish
        )
    }

    /// Whether images should be published.
    pub fn should_publish(&self) -> bool {
        matches!(
            self,
            ContainerSupport::PublishOnly | ContainerSupport::BuildAndPublish
        )
    }

    /// Legacy boolean interop.
    pub fn from_bool(enabled: bool) -> Self {
        if enabled {
            ContainerSupport::BuildAndPublish
        } else {
            ContainerSupport::None
        }
    }
}

impl fmt::Display for ContainerSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerSupport::None => "None",
            ContainerSupport::BuildOnly => "Build Only",
            ContainerSupport::PublishOnly => "Publish Only",
            ContainerSupport::BuildAndPublish => "Build and Publish",
        })
    }
}

/// Artifact signing level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SigningLevel {
    /// No signing.
    #[default]
    None,
    /// Keyless signing of checksums.
    Basic,
    /// Signing with additional verification.
    Advanced,
    /// Full-compliance signing.
    Enterprise,
}

impl SigningLevel {
    /// Whether any signing is configured.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, SigningLevel::None)
    }

    /// Legacy boolean interop.
    pub fn from_bool(enabled: bool) -> Self {
        if enabled {
            SigningLevel::Basic
        } else {
            SigningLevel::None
        }
    }

    /// Signing level recommended for a project kind.
    pub fn recommended_for(kind: ProjectKind) -> SigningLevel {
        match kind {
            ProjectKind::Cli => SigningLevel::Basic,
            ProjectKind::WebService | ProjectKind::ApiService => SigningLevel::Advanced,
            ProjectKind::Desktop => SigningLevel::Enterprise,
            ProjectKind::Library => SigningLevel::None,
        }
    }
}

impl fmt::Display for SigningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SigningLevel::None => "None",
            SigningLevel::Basic => "Basic",
            SigningLevel::Advanced => "Advanced",
            SigningLevel::Enterprise => "Enterprise",
        })
    }
}

/// How much CI workflow to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CiGenerationLevel {
    /// No CI workflow.
    #[default]
    None,
    /// A plain release workflow.
    Basic,
    /// The release workflow plus a build cache step.
    Advanced,
}

impl CiGenerationLevel {
    /// Whether a workflow should be generated at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, CiGenerationLevel::None)
    }

    /// Legacy boolean interop.
    pub fn from_bool(enabled: bool) -> Self {
        if enabled {
            CiGenerationLevel::Basic
        } else {
            CiGenerationLevel::None
        }
    }

    /// CI generation level recommended for a project kind.
    pub fn recommended_for(kind: ProjectKind) -> CiGenerationLevel {
        match kind {
            ProjectKind::Cli | ProjectKind::ApiService | ProjectKind::Desktop => {
                CiGenerationLevel::Advanced
            }
            ProjectKind::WebService | ProjectKind::Library => CiGenerationLevel::Basic,
        }
    }
}

impl fmt::Display for CiGenerationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CiGenerationLevel::None => "None",
            CiGenerationLevel::Basic => "Basic",
            CiGenerationLevel::Advanced => "Advanced",
        })
    }
}

/// Feature tier of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureTier {
    /// Standard projects.
    #[default]
    Basic,
    /// Larger projects.
    Professional,
    /// Full-compliance projects.
    Enterprise,
}

impl FeatureTier {
    /// Whether professional-or-better features are on.
    pub fn is_pro(&self) -> bool {
        !matches!(self, FeatureTier::Basic)
    }

    /// Legacy boolean interop.
    pub fn from_bool(pro: bool) -> Self {
        if pro {
            FeatureTier::Professional
        } else {
            FeatureTier::Basic
        }
    }

    /// Feature tier recommended for a project kind.
    pub fn recommended_for(kind: ProjectKind) -> FeatureTier {
        match kind {
            ProjectKind::ApiService | ProjectKind::WebService => FeatureTier::Professional,
            ProjectKind::Desktop => FeatureTier::Enterprise,
            ProjectKind::Cli | ProjectKind::Library => FeatureTier::Basic,
        }
    }
}

impl fmt::Display for FeatureTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FeatureTier::Basic => "Basic",
            FeatureTier::Professional => "Professional",
            FeatureTier::Enterprise => "Enterprise",
        })
    }
}
