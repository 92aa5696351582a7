//! Configuration lifecycle states and the transition table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a configuration.
///
/// Freshly constructed configurations are `Draft`. Validation ends in
/// `Valid` or `Invalid`; generation runs through `Processing` and ends in
/// `Generated` on success. `Generated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigState {
    /// Being created or modified.
    #[default]
    Draft,
    /// Validated and ready for generation.
    Valid,
    /// Validation found errors.
    Invalid,
    /// A generation plan is running.
    Processing,
    /// Artifacts were generated successfully.
    Generated,
}

impl ConfigState {
    /// All states in declaration order.
    pub const ALL: [ConfigState; 5] = [
        ConfigState::Draft,
        ConfigState::Valid,
        ConfigState::Invalid,
        ConfigState::Processing,
        ConfigState::Generated,
    ];

    /// Stable slug.
    pub fn slug(&self) -> &'static str {
        match self {
            ConfigState::Draft => "draft",
            ConfigState::Valid => "valid",
            ConfigState::Invalid => "invalid",
            ConfigState::Processing => "processing",
            ConfigState::Generated => "generated",
        }
    }

    /// One-line description of the state.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigState::Draft => "Configuration is being created or modified",
            ConfigState::Valid => "Configuration is valid and ready",
            ConfigState::Invalid => "Configuration has validation errors",
            ConfigState::Processing => "Configuration is being processed",
            ConfigState::Generated => "Configuration has been generated successfully",
        }
    }

    /// Whether this is a terminal state.
    pub fn is_final(&self) -> bool {
        matches!(self, ConfigState::Generated)
    }

    /// Whether validation may run in this state.
    pub fn allows_validation(&self) -> bool {
        matches!(
            self,
            ConfigState::Draft | ConfigState::Valid | ConfigState::Invalid
        )
    }

    /// Whether artifact generation may start from this state.
    pub fn allows_generation(&self) -> bool {
        matches!(self, ConfigState::Valid)
    }

    /// Whether `(self, next)` is an edge of the lifecycle graph.
    pub fn allows_transition_to(&self, next: ConfigState) -> bool {
        match self {
            ConfigState::Draft => matches!(next, ConfigState::Valid | ConfigState::Invalid),
            ConfigState::Valid => {
                matches!(next, ConfigState::Invalid | ConfigState::Processing)
            }
            ConfigState::Invalid => {
                matches!(next, ConfigState::Valid | ConfigState::Processing)
            }
            ConfigState::Processing => matches!(
                next,
                ConfigState::Valid | ConfigState::Invalid | ConfigState::Generated
            ),
            ConfigState::Generated => false,
        }
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigState::Draft => "Draft",
            ConfigState::Valid => "Valid",
            ConfigState::Invalid => "Invalid",
            ConfigState::Processing => "Processing",
            ConfigState::Generated => "Generated",
        })
    }
}
