//! Format-specific escaping for emitted artifacts.
//!
//! All emitters route free-form strings through these functions; none of
//! them inlines its own quoting rules. Every operation first applies
//! [`sanitize_input`], which strips C0 controls (keeping `\t`, `\n`,
//! `\r`), drops NUL bytes, and trims leading/trailing spaces and tabs
//! while preserving internal newlines.

pub use crate::security::sanitize_input;

use crate::security::contains_shell_injection;

/// Characters that force single-quoting of a YAML scalar wherever they
/// appear. `-`, `!`, and `&` are dangerous only in leading position and
/// are handled separately, so bare words like `my-cli` stay unquoted.
const YAML_QUOTE_ANYWHERE: &[char] = &[
    ':', '{', '}', '[', ']', ',', '*', '#', '?', '|', '<', '>', '"', '\'', '%', '@', '`',
];

fn looks_like_number(value: &str) -> bool {
    let mut has_digit = false;
    for c in value.chars() {
        if c.is_ascii_digit() {
            has_digit = true;
        } else if !matches!(c, '.' | '-' | '+' | 'e' | 'E') {
            return false;
        }
    }
    has_digit
}

fn needs_yaml_quoting(value: &str) -> bool {
    value.contains(YAML_QUOTE_ANYWHERE)
        || value.starts_with([' ', '-', '!', '&'])
        || value.ends_with(' ')
        || looks_like_number(value)
}

fn indent_block(value: &str) -> String {
    value
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape a value for YAML output.
///
/// Empty input stays empty. Multi-line values become `|-` literal block
/// scalars with every line indented two spaces. Single-line values that
/// need quoting are single-quoted with internal `'` doubled; everything
/// else is emitted bare.
pub fn escape_yaml(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let value = sanitize_input(value);
    if value.is_empty() {
        return String::new();
    }

    if value.contains('\n') {
        return format!("|-\n{}", indent_block(&value));
    }

    if needs_yaml_quoting(&value) {
        return format!("'{}'", value.replace('\'', "''"));
    }

    value
}

/// Escape a value for shell usage.
///
/// Values containing any shell-injection pattern are refused outright:
/// the result is empty and the caller must treat that as a refusal, not
/// an empty argument.
pub fn escape_shell(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let value = sanitize_input(value);
    if contains_shell_injection(&value) {
        return String::new();
    }

    format!("'{}'", value.replace('\'', "''"))
}

/// Escape a value for a CI workflow file.
///
/// Applies YAML escaping, then neutralises CI expression interpolation
/// by splitting every `${{` occurrence.
pub fn escape_ci_expression(value: &str) -> String {
    let escaped = escape_yaml(value);
    if escaped.contains("${{") {
        return escaped.replace("${{", "${{ '' }}${{");
    }
    escaped
}

/// Escape a value as a JSON string, including the surrounding quotes.
pub fn escape_json(value: &str) -> String {
    let value = sanitize_input(value);
    serde_json::to_string(&value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Escape a value for use as an image label.
///
/// Every character outside `[A-Za-z0-9._-]` maps to `-`; results that
/// would start with a digit, dot, or hyphen get a `label-` prefix.
pub fn escape_image_label(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let value = sanitize_input(value);
    let mapped: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    match mapped.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '.' || c == '-' => format!("label-{mapped}"),
        _ => mapped,
    }
}
