//! Validation report.

use relforge_domain::DomainError;

/// Outcome of validating a configuration.
///
/// `ok` is true exactly when no errors were recorded; warnings never
/// affect it. Entries appear in declared field order.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Whether the configuration satisfies every invariant.
    pub ok: bool,
    /// Rule violations, in declared field order.
    pub errors: Vec<DomainError>,
    /// Advisory findings that do not block generation.
    pub warnings: Vec<DomainError>,
}

impl ValidationReport {
    /// Create an empty, passing report.
    pub fn new() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record an error; flips `ok` to false.
    pub fn add_error(&mut self, error: DomainError) {
        self.ok = false;
        self.errors.push(error);
    }

    /// Record a warning; `ok` is unaffected.
    pub fn add_warning(&mut self, warning: DomainError) {
        self.warnings.push(warning);
    }

    /// Fold a field-validator result into the report.
    pub fn check(&mut self, result: Result<(), DomainError>) {
        if let Err(error) = result {
            self.add_error(error);
        }
    }

    /// Whether any finding (error or warning) was recorded.
    pub fn has_findings(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}
