//! Container registries and their capability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ErrorCode};

/// Container registries an image can be pushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRegistry {
    /// Docker Hub.
    #[serde(rename = "docker.io")]
    DockerHub,
    /// GitHub Container Registry.
    #[serde(rename = "ghcr.io")]
    Ghcr,
    /// GitLab Container Registry.
    #[serde(rename = "registry.gitlab.com")]
    GitLabRegistry,
    /// Quay.io.
    #[serde(rename = "quay.io")]
    Quay,
    /// A custom, user-operated registry.
    Custom,
}

impl ContainerRegistry {
    /// All registries in declaration order.
    pub const ALL: [ContainerRegistry; 5] = [
        ContainerRegistry::DockerHub,
        ContainerRegistry::Ghcr,
        ContainerRegistry::GitLabRegistry,
        ContainerRegistry::Quay,
        ContainerRegistry::Custom,
    ];

    /// Stable slug, which doubles as the registry host where one exists.
    pub fn slug(&self) -> &'static str {
        match self {
            ContainerRegistry::DockerHub => "docker.io",
            ContainerRegistry::Ghcr => "ghcr.io",
            ContainerRegistry::GitLabRegistry => "registry.gitlab.com",
            ContainerRegistry::Quay => "quay.io",
            ContainerRegistry::Custom => "custom",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ContainerRegistry::DockerHub => "Docker Hub",
            ContainerRegistry::Ghcr => "GitHub Container Registry",
            ContainerRegistry::GitLabRegistry => "GitLab Registry",
            ContainerRegistry::Quay => "Quay.io",
            ContainerRegistry::Custom => "Custom Registry",
        }
    }

    /// Registry hostname for image templates; empty for custom registries.
    pub fn host(&self) -> &'static str {
        match self {
            ContainerRegistry::Custom => "",
            other => other.slug(),
        }
    }

    /// Anchored pattern a registry reference must match; empty means
    /// user-defined (custom registries).
    pub fn url_pattern(&self) -> &'static str {
        match self {
            ContainerRegistry::DockerHub => "^[a-z0-9]([a-z0-9-]*[a-z0-9])?$",
            ContainerRegistry::Ghcr => r"^ghcr\.io/[a-z0-9-]+/[a-z0-9-]+$",
            ContainerRegistry::GitLabRegistry => {
                r"^registry\.gitlab\.com/[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+$"
            }
            ContainerRegistry::Quay => r"^quay\.io/[a-z0-9-]+/[a-z0-9-]+$",
            ContainerRegistry::Custom => "",
        }
    }

    /// Whether the registry accepts HTTPS only.
    pub fn https_only(&self) -> bool {
        !matches!(self, ContainerRegistry::DockerHub)
    }

    /// Whether pushing requires authentication.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, ContainerRegistry::DockerHub)
    }

    /// Parse a registry from its slug.
    pub fn from_slug(slug: &str) -> Option<ContainerRegistry> {
        ContainerRegistry::ALL.iter().copied().find(|r| r.slug() == slug)
    }
}

impl fmt::Display for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ContainerRegistry {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContainerRegistry::from_slug(&s.to_ascii_lowercase()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvalidContainerRegistry,
                "Invalid container registry",
            )
            .with_details(format!("'{s}' is not a supported container registry"))
        })
    }
}
