//! Final security scan over rendered artifacts.

use relforge_domain::{DomainError, DomainResult, ErrorCode};

/// The kind of artifact being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The release-tool manifest.
    Manifest,
    /// The CI workflow.
    CiWorkflow,
}

/// Patterns that must never survive into an emitted artifact.
const DANGEROUS_PATTERNS: &[&str] = &[
    "<script",
    "javascript:",
    "`",
    "$(",
    ";rm",
    "|rm",
    "&&rm",
];

/// Expression heads the workflow emitter itself writes; anything else
/// after `${{` is treated as an injection that escaped neutralisation.
const ALLOWED_EXPRESSION_HEADS: &[&str] = &["''", "secrets.", "runner.", "hashFiles("];

/// Scan rendered text and fail if any dangerous pattern survived
/// escaping. CI artifacts additionally reject `${{` expressions other
/// than the neutralisation marker and the expression heads the workflow
/// emitter itself writes.
pub fn validate_rendered_artifact(content: &str, kind: ArtifactKind) -> DomainResult<()> {
    let lower = content.to_ascii_lowercase();
    for pattern in DANGEROUS_PATTERNS {
        if lower.contains(pattern) {
            return Err(DomainError::new(
                ErrorCode::RenderedArtifactFailed,
                "Rendered artifact contains dangerous content",
            )
            .with_details(format!("found '{pattern}' in the rendered output")));
        }
    }

    if kind == ArtifactKind::CiWorkflow {
        for (index, _) in content.match_indices("${{") {
            let rest = content[index + 3..].trim_start();
            let allowed = ALLOWED_EXPRESSION_HEADS
                .iter()
                .any(|head| rest.starts_with(head));
            if !allowed {
                return Err(DomainError::new(
                    ErrorCode::RenderedArtifactFailed,
                    "Rendered workflow contains an un-neutralised expression",
                )
                .with_details("found an unexpected '${{' expression".to_string()));
            }
        }
    }

    Ok(())
}
