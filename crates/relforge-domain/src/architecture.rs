//! Target CPU architectures and their capability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ErrorCode};

/// Supported CPU architectures.
///
/// Declaration order is the canonical emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// 64-bit x86.
    Amd64,
    /// 64-bit ARM.
    Arm64,
    /// 32-bit x86.
    #[serde(rename = "386")]
    X86,
    /// 32-bit ARM.
    #[serde(rename = "arm")]
    Arm32,
    /// 64-bit PowerPC, big endian.
    Ppc64,
    /// 64-bit PowerPC, little endian.
    #[serde(rename = "ppc64le")]
    Ppc64Le,
    /// IBM System z.
    S390x,
    /// 32-bit MIPS, big endian.
    Mips,
    /// 32-bit MIPS, little endian.
    #[serde(rename = "mipsle")]
    MipsLe,
}

impl Architecture {
    /// All architectures in declaration order.
    pub const ALL: [Architecture; 9] = [
        Architecture::Amd64,
        Architecture::Arm64,
        Architecture::X86,
        Architecture::Arm32,
        Architecture::Ppc64,
        Architecture::Ppc64Le,
        Architecture::S390x,
        Architecture::Mips,
        Architecture::MipsLe,
    ];

    /// Stable slug used in serialized artifacts.
    pub fn slug(&self) -> &'static str {
        match self {
            Architecture::Amd64 => "amd64",
            Architecture::Arm64 => "arm64",
            Architecture::X86 => "386",
            Architecture::Arm32 => "arm",
            Architecture::Ppc64 => "ppc64",
            Architecture::Ppc64Le => "ppc64le",
            Architecture::S390x => "s390x",
            Architecture::Mips => "mips",
            Architecture::MipsLe => "mipsle",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Architecture::Amd64 => "64-bit x86",
            Architecture::Arm64 => "64-bit ARM",
            Architecture::X86 => "32-bit x86",
            Architecture::Arm32 => "32-bit ARM",
            Architecture::Ppc64 => "64-bit PowerPC (big endian)",
            Architecture::Ppc64Le => "64-bit PowerPC (little endian)",
            Architecture::S390x => "IBM System z",
            Architecture::Mips => "32-bit MIPS (big endian)",
            Architecture::MipsLe => "32-bit MIPS (little endian)",
        }
    }

    /// Whether every platform supports this architecture.
    pub fn universally_available(&self) -> bool {
        matches!(
            self,
            Architecture::Amd64 | Architecture::Arm64 | Architecture::X86 | Architecture::Arm32
        )
    }

    /// Whether this is a 64-bit architecture.
    pub fn is_64bit(&self) -> bool {
        matches!(
            self,
            Architecture::Amd64
                | Architecture::Arm64
                | Architecture::Ppc64
                | Architecture::Ppc64Le
                | Architecture::S390x
        )
    }

    /// Parse an architecture from its slug.
    pub fn from_slug(slug: &str) -> Option<Architecture> {
        Architecture::ALL.iter().copied().find(|a| a.slug() == slug)
    }

    /// Recommended default architecture set for new configurations.
    pub fn recommended() -> Vec<Architecture> {
        vec![Architecture::Amd64, Architecture::Arm64]
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Architecture {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Architecture::from_slug(&s.to_ascii_lowercase()).ok_or_else(|| {
            DomainError::new(ErrorCode::InvalidArchitecture, "Invalid architecture")
                .with_details(format!("'{s}' is not a supported architecture"))
        })
    }
}
