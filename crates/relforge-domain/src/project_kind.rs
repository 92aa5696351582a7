//! Project kinds and their capability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ErrorCode};
use crate::platform::Platform;

/// The kind of project being configured for release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Command-line application: single binary, cross-platform.
    Cli,
    /// Web service: HTTP server, container-focused.
    #[serde(rename = "web")]
    WebService,
    /// Library: package with an optional helper binary.
    Library,
    /// API service: REST or RPC backend.
    #[serde(rename = "api")]
    ApiService,
    /// Desktop application with a GUI.
    Desktop,
}

impl ProjectKind {
    /// All project kinds in declaration order.
    pub const ALL: [ProjectKind; 5] = [
        ProjectKind::Cli,
        ProjectKind::WebService,
        ProjectKind::Library,
        ProjectKind::ApiService,
        ProjectKind::Desktop,
    ];

    /// Stable slug used in serialized artifacts.
    pub fn slug(&self) -> &'static str {
        match self {
            ProjectKind::Cli => "cli",
            ProjectKind::WebService => "web",
            ProjectKind::Library => "library",
            ProjectKind::ApiService => "api",
            ProjectKind::Desktop => "desktop",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectKind::Cli => "CLI Application",
            ProjectKind::WebService => "Web Service",
            ProjectKind::Library => "Library",
            ProjectKind::ApiService => "API Service",
            ProjectKind::Desktop => "Desktop Application",
        }
    }

    /// Whether native compilation is enabled by default for this kind.
    pub fn default_native_compilation(&self) -> bool {
        match self {
            ProjectKind::Cli | ProjectKind::Library => false,
            ProjectKind::WebService | ProjectKind::ApiService | ProjectKind::Desktop => true,
        }
    }

    /// Platforms recommended for this kind.
    pub fn recommended_platforms(&self) -> &'static [Platform] {
        match self {
            ProjectKind::Cli | ProjectKind::Library => {
                &[Platform::Linux, Platform::Darwin, Platform::Windows]
            }
            ProjectKind::WebService | ProjectKind::ApiService => {
                &[Platform::Linux, Platform::Darwin]
            }
            ProjectKind::Desktop => &[Platform::Windows, Platform::Darwin, Platform::Linux],
        }
    }

    /// Whether container image builds make sense for this kind.
    pub fn container_build_supported(&self) -> bool {
        match self {
            ProjectKind::Cli | ProjectKind::WebService | ProjectKind::ApiService => true,
            ProjectKind::Library | ProjectKind::Desktop => false,
        }
    }

    /// Whether an entry path is required to build this kind.
    pub fn requires_entry_path(&self) -> bool {
        !matches!(self, ProjectKind::Library)
    }

    /// Default binary name for this kind.
    pub fn default_binary_name(&self) -> &'static str {
        match self {
            ProjectKind::Cli => "cli-app",
            ProjectKind::WebService => "server",
            ProjectKind::Library => "lib-tool",
            ProjectKind::ApiService => "api",
            ProjectKind::Desktop => "app",
        }
    }

    /// Parse a project kind from its slug.
    pub fn from_slug(slug: &str) -> Option<ProjectKind> {
        ProjectKind::ALL.iter().copied().find(|k| k.slug() == slug)
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProjectKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectKind::from_slug(&s.to_ascii_lowercase()).ok_or_else(|| {
            DomainError::new(ErrorCode::InvalidProjectName, "Invalid project kind")
                .with_details(format!("'{s}' is not a supported project kind"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for kind in ProjectKind::ALL {
            assert_eq!(ProjectKind::from_slug(kind.slug()), Some(kind));
        }
    }

    #[test]
    fn libraries_do_not_build_containers() {
        assert!(!ProjectKind::Library.container_build_supported());
        assert!(!ProjectKind::Desktop.container_build_supported());
        assert!(ProjectKind::WebService.container_build_supported());
    }

    #[test]
    fn only_libraries_skip_the_entry_path() {
        for kind in ProjectKind::ALL {
            assert_eq!(
                kind.requires_entry_path(),
                kind != ProjectKind::Library,
                "{kind}"
            );
        }
    }

    #[test]
    fn cli_targets_the_big_three() {
        assert_eq!(
            ProjectKind::Cli.recommended_platforms(),
            &[Platform::Linux, Platform::Darwin, Platform::Windows]
        );
    }

    #[test]
    fn services_default_to_native_compilation() {
        assert!(ProjectKind::WebService.default_native_compilation());
        assert!(!ProjectKind::Cli.default_native_compilation());
    }
}
