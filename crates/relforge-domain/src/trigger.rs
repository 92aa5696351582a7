//! CI workflow triggers and their capability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ErrorCode};
use crate::project_kind::ProjectKind;

/// CI events that can trigger a release workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    /// Pushes of version tags (`v*`).
    VersionTags,
    /// Pushes of any tag.
    AllTags,
    /// Manual dispatch from the forge UI.
    Manual,
    /// Pushes to the main branch.
    #[serde(rename = "main")]
    MainBranch,
    /// A published release.
    #[serde(rename = "release")]
    PublishedRelease,
}

impl TriggerKind {
    /// All triggers in declaration order; this is the emission order of
    /// the workflow `on:` section.
    pub const ALL: [TriggerKind; 5] = [
        TriggerKind::VersionTags,
        TriggerKind::AllTags,
        TriggerKind::Manual,
        TriggerKind::MainBranch,
        TriggerKind::PublishedRelease,
    ];

    /// Stable slug.
    pub fn slug(&self) -> &'static str {
        match self {
            TriggerKind::VersionTags => "version-tags",
            TriggerKind::AllTags => "all-tags",
            TriggerKind::Manual => "manual",
            TriggerKind::MainBranch => "main",
            TriggerKind::PublishedRelease => "release",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TriggerKind::VersionTags => "Version Tags (v*)",
            TriggerKind::AllTags => "All Tags (*)",
            TriggerKind::Manual => "Manual Trigger",
            TriggerKind::MainBranch => "Push to Main",
            TriggerKind::PublishedRelease => "Published Release",
        }
    }

    /// The workflow `on:` YAML fragment for this trigger, unindented.
    pub fn ci_pattern(&self) -> &'static str {
        match self {
            TriggerKind::VersionTags => "push:\n  tags:\n    - 'v*'",
            TriggerKind::AllTags => "push:\n  tags:\n    - '*'",
            TriggerKind::Manual => "workflow_dispatch:",
            TriggerKind::MainBranch => "push:\n  branches:\n    - main",
            TriggerKind::PublishedRelease => "release:\n  types: [published]",
        }
    }

    /// Short description shown next to the option in the form.
    pub fn description(&self) -> &'static str {
        match self {
            TriggerKind::VersionTags => "Triggers on version tags like v1.0.0",
            TriggerKind::AllTags => "Triggers on any tag",
            TriggerKind::Manual => "Can be triggered manually from the forge UI",
            TriggerKind::MainBranch => "Triggers on pushes to the main branch",
            TriggerKind::PublishedRelease => "Triggers when a release is published",
        }
    }

    /// Project kinds this trigger is recommended for.
    pub fn recommended_for(&self) -> &'static [ProjectKind] {
        match self {
            TriggerKind::VersionTags => {
                &[ProjectKind::Cli, ProjectKind::WebService, ProjectKind::ApiService]
            }
            TriggerKind::AllTags => &[ProjectKind::Library],
            TriggerKind::Manual | TriggerKind::PublishedRelease => &[
                ProjectKind::Cli,
                ProjectKind::WebService,
                ProjectKind::ApiService,
                ProjectKind::Desktop,
            ],
            TriggerKind::MainBranch => &[ProjectKind::WebService, ProjectKind::ApiService],
        }
    }

    /// Triggers recommended for a given project kind, in declaration order.
    pub fn recommended_triggers(kind: ProjectKind) -> Vec<TriggerKind> {
        TriggerKind::ALL
            .iter()
            .copied()
            .filter(|t| t.recommended_for().contains(&kind))
            .collect()
    }

    /// Parse a trigger from its slug.
    pub fn from_slug(slug: &str) -> Option<TriggerKind> {
        TriggerKind::ALL.iter().copied().find(|t| t.slug() == slug)
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TriggerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TriggerKind::from_slug(&s.to_ascii_lowercase()).ok_or_else(|| {
            DomainError::new(ErrorCode::InvalidTrigger, "Invalid trigger")
                .with_details(format!("'{s}' is not a supported trigger"))
        })
    }
}
