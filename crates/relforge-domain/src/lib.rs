#![warn(missing_docs)]

//! Relforge domain model
//!
//! Closed-world, strongly-typed model of a release configuration: project
//! kind, target platforms and architectures, trigger set, container
//! registry, feature tiers, and the configuration lifecycle state machine.
//! Every enum is backed by a static capability table, so impossible
//! combinations are unrepresentable and adding a variant without updating
//! its table is a compile error.

pub mod architecture;
pub mod build_flag;
pub mod config;
pub mod error;
pub mod hosting_provider;
pub mod levels;
pub mod platform;
pub mod ports;
pub mod project_kind;
pub mod registry;
pub mod state;
pub mod trigger;

#[cfg(test)]
mod defaults_properties;

#[cfg(test)]
mod state_properties;

pub use architecture::Architecture;
pub use build_flag::BuildFlag;
pub use config::Configuration;
pub use error::{DomainError, DomainResult, ErrorCode, ErrorKind, Severity};
pub use hosting_provider::HostingProvider;
pub use levels::{
    CiGenerationLevel, ContainerSupport, FeatureTier, NativeCompilation, SigningLevel,
};
pub use platform::Platform;
pub use ports::{
    FileInfo, FileSystemPort, FieldValidator, FormOption, FormRunner, DEFAULT_DIR_MODE,
    DEFAULT_FILE_MODE,
};
pub use project_kind::ProjectKind;
pub use registry::ContainerRegistry;
pub use state::ConfigState;
pub use trigger::TriggerKind;
