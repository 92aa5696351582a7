//! Target platforms and their capability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::architecture::Architecture;
use crate::error::{DomainError, ErrorCode};

/// Supported target platforms.
///
/// Declaration order is the canonical emission order for generated
/// artifacts; user-input order never affects output bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux.
    Linux,
    /// macOS.
    Darwin,
    /// Windows.
    Windows,
    /// FreeBSD.
    #[serde(rename = "freebsd")]
    FreeBsd,
    /// OpenBSD.
    #[serde(rename = "openbsd")]
    OpenBsd,
    /// NetBSD.
    #[serde(rename = "netbsd")]
    NetBsd,
}

impl Platform {
    /// All platforms in declaration order.
    pub const ALL: [Platform; 6] = [
        Platform::Linux,
        Platform::Darwin,
        Platform::Windows,
        Platform::FreeBsd,
        Platform::OpenBsd,
        Platform::NetBsd,
    ];

    /// Stable slug used in serialized artifacts.
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Windows => "windows",
            Platform::FreeBsd => "freebsd",
            Platform::OpenBsd => "openbsd",
            Platform::NetBsd => "netbsd",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Darwin => "macOS",
            Platform::Windows => "Windows",
            Platform::FreeBsd => "FreeBSD",
            Platform::OpenBsd => "OpenBSD",
            Platform::NetBsd => "NetBSD",
        }
    }

    /// Architectures this platform can target.
    pub fn supported_architectures(&self) -> &'static [Architecture] {
        match self {
            Platform::Linux => &[
                Architecture::Amd64,
                Architecture::Arm64,
                Architecture::Arm32,
                Architecture::X86,
            ],
            Platform::Darwin => &[Architecture::Amd64, Architecture::Arm64],
            Platform::Windows => &[
                Architecture::Amd64,
                Architecture::Arm64,
                Architecture::X86,
            ],
            Platform::FreeBsd | Platform::OpenBsd | Platform::NetBsd => &[
                Architecture::Amd64,
                Architecture::Arm64,
                Architecture::X86,
            ],
        }
    }

    /// Whether an architecture is in this platform's supported set.
    pub fn supports_architecture(&self, arch: Architecture) -> bool {
        self.supported_architectures().contains(&arch)
    }

    /// True for the Windows family.
    pub fn is_windows_family(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// True for Unix-like platforms.
    pub fn is_unix_like(&self) -> bool {
        !self.is_windows_family()
    }

    /// Whether native (FFI-linked) compilation is available on this platform.
    pub fn supports_native_compilation(&self) -> bool {
        match self {
            Platform::Linux
            | Platform::Darwin
            | Platform::Windows
            | Platform::FreeBsd
            | Platform::OpenBsd
            | Platform::NetBsd => true,
        }
    }

    /// Parse a platform from its slug.
    pub fn from_slug(slug: &str) -> Option<Platform> {
        Platform::ALL.iter().copied().find(|p| p.slug() == slug)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::from_slug(&s.to_ascii_lowercase()).ok_or_else(|| {
            DomainError::new(ErrorCode::InvalidPlatform, "Invalid platform")
                .with_details(format!("'{s}' is not a supported platform"))
        })
    }
}
