//! Domain error taxonomy
//!
//! A closed set of error codes, each with a kind, a severity, a
//! recoverability flag, and a recovery hint for user display. Errors carry
//! a machine-readable code plus human-readable message, optional details,
//! optional field context, and an optional underlying cause.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Broad classification of an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A single field failed its grammar or range checks.
    ValidationField,
    /// A cross-field invariant of the configuration was violated.
    InvariantViolation,
    /// A security rule rejected the input or the rendered output.
    SecurityRule,
    /// A filesystem or external-tool lookup failed.
    Io,
    /// Artifact emission failed.
    Emission,
    /// The job orchestrator reported a failure.
    Orchestration,
    /// An external collaborator (VCS, registry) failed.
    External,
}

/// Severity of an error, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational only.
    Info,
    /// The user should review but may proceed.
    Warning,
    /// The operation cannot proceed until fixed.
    Error,
    /// The environment itself is broken.
    Critical,
}

/// All possible error codes in the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Field validation
    /// Project name failed validation.
    InvalidProjectName,
    /// Binary name failed validation.
    InvalidBinaryName,
    /// Entry path failed validation.
    InvalidEntryPath,
    /// Description failed validation.
    InvalidDescription,
    /// Unknown or incompatible platform.
    InvalidPlatform,
    /// Unknown architecture.
    InvalidArchitecture,
    /// Unknown hosting provider.
    InvalidHostingProvider,
    /// Unknown or malformed container registry.
    InvalidContainerRegistry,
    /// Unknown CI trigger.
    InvalidTrigger,
    /// Build flag failed validation.
    InvalidBuildFlag,
    /// Unknown configuration state.
    InvalidConfigState,

    // Invariant violations
    /// An architecture is not supported on a selected platform.
    PlatformArchMismatch,
    /// Container support enabled for a project kind that cannot build containers.
    ContainerNotSupported,
    /// The project kind requires an entry path but none was given.
    EntryPathRequired,
    /// The requested lifecycle transition is not an allowed edge.
    InvalidStateTransition,
    /// A required field is empty.
    MissingRequiredField,
    /// A field exceeds its maximum length.
    FieldTooLong,
    /// A field is shorter than its minimum length.
    FieldTooShort,

    // Security rules
    /// Shell metacharacters or injection patterns were found.
    DangerousCharacters,
    /// The name is in the reserved-name set.
    ReservedName,
    /// A URL does not match the registry's expected pattern.
    InvalidUrlPattern,
    /// A rendered artifact failed the final security scan.
    RenderedArtifactFailed,

    // IO
    /// A file does not exist.
    FileNotFound,
    /// Access to a path was denied.
    PermissionDenied,
    /// Writing a file failed.
    FileWriteFailed,
    /// Reading a file failed.
    FileReadFailed,
    /// Creating a directory failed.
    DirectoryCreateFailed,
    /// A required tool was not found on PATH.
    DependencyNotFound,
    /// The target artifact already exists and overwrite was not forced.
    ConfigurationExists,

    // Emission
    /// Rendering an artifact failed.
    EmitFailed,
    /// Escaping refused a value containing injection patterns.
    EscapingRefused,

    // Orchestration
    /// A job in the plan failed.
    JobFailed,
    /// The plan was cancelled.
    Cancelled,
    /// The plan exceeded its timeout.
    Timeout,
    /// Rolling back a job failed.
    RollbackFailed,

    // External
    /// A version-control operation failed.
    VcsOperationFailed,
    /// A container registry denied access.
    RegistryAccessDenied,
}

impl ErrorCode {
    /// The broad kind this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::InvalidProjectName
            | ErrorCode::InvalidBinaryName
            | ErrorCode::InvalidEntryPath
            | ErrorCode::InvalidDescription
            | ErrorCode::InvalidPlatform
            | ErrorCode::InvalidArchitecture
            | ErrorCode::InvalidHostingProvider
            | ErrorCode::InvalidContainerRegistry
            | ErrorCode::InvalidTrigger
            | ErrorCode::InvalidBuildFlag
            | ErrorCode::InvalidConfigState => ErrorKind::ValidationField,

            ErrorCode::PlatformArchMismatch
            | ErrorCode::ContainerNotSupported
            | ErrorCode::EntryPathRequired
            | ErrorCode::InvalidStateTransition
            | ErrorCode::MissingRequiredField
            | ErrorCode::FieldTooLong
            | ErrorCode::FieldTooShort => ErrorKind::InvariantViolation,

            ErrorCode::DangerousCharacters
            | ErrorCode::ReservedName
            | ErrorCode::InvalidUrlPattern
            | ErrorCode::RenderedArtifactFailed => ErrorKind::SecurityRule,

            ErrorCode::FileNotFound
            | ErrorCode::PermissionDenied
            | ErrorCode::FileWriteFailed
            | ErrorCode::FileReadFailed
            | ErrorCode::DirectoryCreateFailed
            | ErrorCode::DependencyNotFound
            | ErrorCode::ConfigurationExists => ErrorKind::Io,

            ErrorCode::EmitFailed | ErrorCode::EscapingRefused => ErrorKind::Emission,

            ErrorCode::JobFailed
            | ErrorCode::Cancelled
            | ErrorCode::Timeout
            | ErrorCode::RollbackFailed => ErrorKind::Orchestration,

            ErrorCode::VcsOperationFailed | ErrorCode::RegistryAccessDenied => {
                ErrorKind::External
            }
        }
    }

    /// Severity derived from the code.
    pub fn severity(&self) -> Severity {
        match self.kind() {
            // Field errors are fixable by the user at the prompt.
            ErrorKind::ValidationField => Severity::Warning,
            ErrorKind::InvariantViolation | ErrorKind::SecurityRule | ErrorKind::Emission => {
                Severity::Error
            }
            ErrorKind::Io => match self {
                ErrorCode::PermissionDenied | ErrorCode::FileNotFound => Severity::Critical,
                _ => Severity::Error,
            },
            ErrorKind::Orchestration | ErrorKind::External => Severity::Error,
        }
    }

    /// Whether the user can recover from this error by changing input.
    pub fn is_recoverable(&self) -> bool {
        self.severity() <= Severity::Error
    }

    /// Whether retrying the same operation is appropriate.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::FileWriteFailed
                | ErrorCode::VcsOperationFailed
                | ErrorCode::RegistryAccessDenied
                | ErrorCode::Timeout
        )
    }

    /// A short, actionable recovery hint for user display.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::InvalidProjectName => {
                "Use letters, numbers, hyphens, underscores, and dots; start and end with an alphanumeric character; 1-63 characters."
            }
            ErrorCode::InvalidBinaryName => {
                "Start with a letter and use only letters, numbers, hyphens, and underscores; avoid reserved names and executable extensions."
            }
            ErrorCode::InvalidEntryPath => {
                "Use a relative path without parent-directory references or special characters."
            }
            ErrorCode::InvalidDescription => "Keep the description under 255 printable characters.",
            ErrorCode::InvalidPlatform => "Pick platforms from the supported set.",
            ErrorCode::InvalidArchitecture => "Pick architectures from the supported set.",
            ErrorCode::InvalidHostingProvider => "Pick a supported hosting provider.",
            ErrorCode::InvalidContainerRegistry => "Pick a supported container registry.",
            ErrorCode::InvalidTrigger => "Pick CI triggers from the supported set.",
            ErrorCode::InvalidBuildFlag => {
                "Build flags must start with a letter and use only letters, numbers, and underscores."
            }
            ErrorCode::InvalidConfigState => "The configuration state is unknown.",
            ErrorCode::PlatformArchMismatch => {
                "Select architectures that are supported on every chosen platform."
            }
            ErrorCode::ContainerNotSupported => {
                "Disable container support or choose a project kind that builds containers."
            }
            ErrorCode::EntryPathRequired => "Provide the path to the build entry point.",
            ErrorCode::InvalidStateTransition => {
                "Validate the configuration before generating artifacts."
            }
            ErrorCode::MissingRequiredField => "Fill in the missing field and try again.",
            ErrorCode::FieldTooLong => "Shorten the field to its maximum length.",
            ErrorCode::FieldTooShort => "The field is too short; provide a longer value.",
            ErrorCode::DangerousCharacters => {
                "Remove shell metacharacters and script fragments from the value."
            }
            ErrorCode::ReservedName => "Choose a name that is not reserved by the OS or toolchain.",
            ErrorCode::InvalidUrlPattern => {
                "Use an HTTPS registry URL without embedded credentials."
            }
            ErrorCode::RenderedArtifactFailed => {
                "The generated output contained unsafe content; review the input values."
            }
            ErrorCode::FileNotFound => "Verify the file exists and the path is correct.",
            ErrorCode::PermissionDenied => {
                "Check file permissions and ensure you have write access to the directory."
            }
            ErrorCode::FileWriteFailed => "Check disk space and permissions, then retry.",
            ErrorCode::FileReadFailed => "Check that the file is readable, then retry.",
            ErrorCode::DirectoryCreateFailed => "Check permissions on the parent directory.",
            ErrorCode::DependencyNotFound => "Install the missing tool and ensure it is on PATH.",
            ErrorCode::ConfigurationExists => {
                "Pass --force to overwrite the existing configuration (a backup is kept)."
            }
            ErrorCode::EmitFailed => "Review the configuration and retry the generation.",
            ErrorCode::EscapingRefused => {
                "The value contains patterns that cannot be safely escaped; remove them."
            }
            ErrorCode::JobFailed => "Inspect the failing step's error and fix its cause.",
            ErrorCode::Cancelled => "The operation was cancelled; re-run it to continue.",
            ErrorCode::Timeout => "The operation timed out; retry, possibly with a longer timeout.",
            ErrorCode::RollbackFailed => {
                "Automatic rollback failed; inspect the working directory manually."
            }
            ErrorCode::VcsOperationFailed => "Check the repository state and retry.",
            ErrorCode::RegistryAccessDenied => "Check registry credentials and retry.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Stable SCREAMING_SNAKE_CASE identifiers, same as the serialized form.
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(s.trim_matches('"'))
    }
}

/// A domain error value: code plus human-readable message, optional
/// details, optional field context, and an optional underlying cause.
#[derive(Debug, Error)]
#[error("[{code}] {message}{}", .context.as_ref().map(|c| format!(" (context: {c})")).unwrap_or_default())]
pub struct DomainError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Optional extra detail, typically naming the offending value.
    pub details: Option<String>,
    /// Optional context, typically the field or file involved.
    pub context: Option<String>,
    /// Optional underlying cause.
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DomainError {
    /// Create an error with a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            context: None,
            cause: None,
        }
    }

    /// Attach details naming the offending value.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach the field or file context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach an underlying cause.
    pub fn with_cause(
        mut self,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Severity derived from the code.
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Whether the user can recover by changing input.
    pub fn is_recoverable(&self) -> bool {
        self.code.is_recoverable()
    }

    /// Whether retrying is appropriate.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    /// Short actionable hint for user display.
    pub fn recovery_hint(&self) -> &'static str {
        self.code.recovery_hint()
    }
}

impl Clone for DomainError {
    fn clone(&self) -> Self {
        // The cause chain is flattened to text; reports hold clones.
        Self {
            code: self.code,
            message: self.message.clone(),
            details: self
                .details
                .clone()
                .or_else(|| self.cause.as_ref().map(|c| c.to_string())),
            context: self.context.clone(),
            cause: None,
        }
    }
}

impl PartialEq for DomainError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.details == other.details
            && self.context == other.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_context() {
        let err = DomainError::new(ErrorCode::InvalidProjectName, "Invalid project name")
            .with_context("project_name");
        assert_eq!(
            err.to_string(),
            "[INVALID_PROJECT_NAME] Invalid project name (context: project_name)"
        );
    }

    #[test]
    fn display_without_context() {
        let err = DomainError::new(ErrorCode::FileNotFound, "File not found");
        assert_eq!(err.to_string(), "[FILE_NOT_FOUND] File not found");
    }

    #[test]
    fn severity_is_derived_from_code() {
        assert_eq!(ErrorCode::InvalidProjectName.severity(), Severity::Warning);
        assert_eq!(ErrorCode::PlatformArchMismatch.severity(), Severity::Error);
        assert_eq!(ErrorCode::PermissionDenied.severity(), Severity::Critical);
        assert_eq!(ErrorCode::DangerousCharacters.severity(), Severity::Error);
    }

    #[test]
    fn critical_errors_are_not_recoverable() {
        assert!(!ErrorCode::PermissionDenied.is_recoverable());
        assert!(ErrorCode::InvalidBinaryName.is_recoverable());
        assert!(ErrorCode::PlatformArchMismatch.is_recoverable());
    }

    #[test]
    fn only_the_documented_codes_are_retryable() {
        let retryable = [
            ErrorCode::FileWriteFailed,
            ErrorCode::VcsOperationFailed,
            ErrorCode::RegistryAccessDenied,
            ErrorCode::Timeout,
        ];
        for code in retryable {
            assert!(code.is_retryable(), "{code} should be retryable");
        }
        assert!(!ErrorCode::FileNotFound.is_retryable());
        assert!(!ErrorCode::JobFailed.is_retryable());
        assert!(!ErrorCode::Cancelled.is_retryable());
    }

    #[test]
    fn every_code_has_a_nonempty_hint() {
        let codes = [
            ErrorCode::InvalidProjectName,
            ErrorCode::ReservedName,
            ErrorCode::ConfigurationExists,
            ErrorCode::RollbackFailed,
            ErrorCode::EscapingRefused,
        ];
        for code in codes {
            assert!(!code.recovery_hint().is_empty());
        }
    }

    #[test]
    fn cause_is_preserved_in_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DomainError::new(ErrorCode::PermissionDenied, "Permission denied")
            .with_cause(io);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn clone_flattens_cause_into_details() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = DomainError::new(ErrorCode::FileWriteFailed, "write failed").with_cause(io);
        let cloned = err.clone();
        assert_eq!(cloned.details.as_deref(), Some("disk gone"));
        assert!(cloned.cause.is_none());
    }
}
