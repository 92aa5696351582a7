//! Release hosting providers and their capability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ErrorCode};
use crate::registry::ContainerRegistry;

/// Hosting providers a release can be published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostingProvider {
    /// GitHub.
    GitHub,
    /// GitLab.
    GitLab,
    /// Bitbucket.
    Bitbucket,
    /// Gitea.
    Gitea,
    /// A self-hosted forge.
    #[serde(rename = "self-hosted")]
    SelfHosted,
}

impl HostingProvider {
    /// All providers in declaration order.
    pub const ALL: [HostingProvider; 5] = [
        HostingProvider::GitHub,
        HostingProvider::GitLab,
        HostingProvider::Bitbucket,
        HostingProvider::Gitea,
        HostingProvider::SelfHosted,
    ];

    /// Stable slug used as the release-block key in the manifest.
    pub fn slug(&self) -> &'static str {
        match self {
            HostingProvider::GitHub => "github",
            HostingProvider::GitLab => "gitlab",
            HostingProvider::Bitbucket => "bitbucket",
            HostingProvider::Gitea => "gitea",
            HostingProvider::SelfHosted => "self-hosted",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            HostingProvider::GitHub => "GitHub",
            HostingProvider::GitLab => "GitLab",
            HostingProvider::Bitbucket => "Bitbucket",
            HostingProvider::Gitea => "Gitea",
            HostingProvider::SelfHosted => "Self-hosted",
        }
    }

    /// The container registry used by default with this provider.
    pub fn default_registry(&self) -> ContainerRegistry {
        match self {
            HostingProvider::GitHub => ContainerRegistry::Ghcr,
            HostingProvider::GitLab => ContainerRegistry::GitLabRegistry,
            HostingProvider::Bitbucket | HostingProvider::Gitea | HostingProvider::SelfHosted => {
                ContainerRegistry::Custom
            }
        }
    }

    /// Whether hosted CI workflows are available on this provider.
    pub fn ci_supported(&self) -> bool {
        match self {
            HostingProvider::GitHub | HostingProvider::GitLab | HostingProvider::Bitbucket => true,
            HostingProvider::Gitea | HostingProvider::SelfHosted => false,
        }
    }

    /// Whether publishing requires a personal access token.
    pub fn requires_personal_token(&self) -> bool {
        !matches!(self, HostingProvider::GitHub)
    }

    /// Parse a provider from its slug.
    pub fn from_slug(slug: &str) -> Option<HostingProvider> {
        HostingProvider::ALL.iter().copied().find(|p| p.slug() == slug)
    }
}

impl fmt::Display for HostingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for HostingProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostingProvider::from_slug(&s.to_ascii_lowercase()).ok_or_else(|| {
            DomainError::new(ErrorCode::InvalidHostingProvider, "Invalid hosting provider")
                .with_details(format!("'{s}' is not a supported hosting provider"))
        })
    }
}
