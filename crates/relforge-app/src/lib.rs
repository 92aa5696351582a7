#![warn(missing_docs)]

//! Relforge application layer
//!
//! The use-case facade the command-line surface binds to. Three
//! operations are exposed — `init`, `generate`, and `validate` — each
//! taking the external ports through an options record and returning a
//! [`Report`]; nothing here panics across the boundary and no state is
//! global.

pub mod flags;
pub mod fs;
pub mod inspector;
pub mod report;
pub mod settings;
pub mod usecases;

pub use flags::GenerateFlags;
pub use fs::StdFileSystem;
pub use inspector::{ProjectInfo, ProjectInspector};
pub use report::Report;
pub use settings::Settings;
pub use usecases::{generate_workflow, init_workflow, validate_workflow, UseCaseOptions};
