#![warn(missing_docs)]

//! Relforge emitters
//!
//! Deterministic rendering of the two release artifacts: the release-tool
//! manifest and the CI workflow. Both emitters are pure functions of the
//! configuration — byte-identical across runs and platforms, UTF-8, LF
//! line endings, no trailing whitespace, final newline. All free-form
//! strings are escaped by `relforge-validation`; emitters never inline
//! their own quoting rules.

pub mod manifest;
pub mod workflow;

pub use manifest::emit_manifest;
pub use workflow::emit_workflow;
