//! The report every use-case operation returns.

use std::path::PathBuf;

use relforge_domain::{ConfigState, DomainError};

/// Machine-readable outcome of a use-case operation.
///
/// The terminal layer applies styling and recovery hints; the report
/// itself carries codes, messages, and the artifact paths that were
/// written.
#[derive(Debug, Default)]
pub struct Report {
    /// Errors, at most one per failed step.
    pub errors: Vec<DomainError>,
    /// Advisory findings.
    pub warnings: Vec<DomainError>,
    /// Suggested follow-ups for the user.
    pub recommendations: Vec<String>,
    /// Artifacts written by the operation.
    pub generated_files: Vec<PathBuf>,
    /// Final lifecycle state of the configuration, where one was
    /// involved.
    pub final_state: Option<ConfigState>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn add_error(&mut self, error: DomainError) {
        self.errors.push(error);
    }

    /// Record a warning.
    pub fn add_warning(&mut self, warning: DomainError) {
        self.warnings.push(warning);
    }

    /// Record a recommendation.
    pub fn add_recommendation(&mut self, recommendation: impl Into<String>) {
        self.recommendations.push(recommendation.into());
    }

    /// Whether the operation succeeded.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit code when bound to a CLI: 0 success, 1 errors
    /// present, 2 warnings but no errors.
    pub fn exit_code(&self) -> i32 {
        if !self.errors.is_empty() {
            1
        } else if !self.warnings.is_empty() {
            2
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relforge_domain::ErrorCode;

    #[test]
    fn exit_codes_follow_the_contract() {
        let mut report = Report::new();
        assert_eq!(report.exit_code(), 0);

        report.add_warning(DomainError::new(ErrorCode::MissingRequiredField, "w"));
        assert_eq!(report.exit_code(), 2);

        report.add_error(DomainError::new(ErrorCode::InvalidProjectName, "e"));
        assert_eq!(report.exit_code(), 1);
        assert!(!report.ok());
    }
}
