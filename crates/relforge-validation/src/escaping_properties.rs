//! Property-based tests for escaping round trips.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::escaping::{escape_json, escape_shell, escape_yaml};
    use crate::security::contains_shell_injection;

    /// YAML parser keywords that a bare scalar would not round-trip as a
    /// string; the escaper is not expected to defend against them, so the
    /// strategy avoids them.
    fn is_yaml_keyword(value: &str) -> bool {
        matches!(
            value.to_ascii_lowercase().as_str(),
            "null" | "~" | "true" | "false" | "yes" | "no" | "on" | "off"
        )
    }

    /// Strings free of injection patterns, edge whitespace, and control
    /// characters, as the round-trip contract requires.
    fn benign_string() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9 ._:{}'#%@?-]{0,30}[a-zA-Z0-9]"
            .prop_filter("no injection patterns", |s| !contains_shell_injection(s))
            .prop_filter("no yaml keywords", |s| !is_yaml_keyword(s))
    }

    /// Printable ASCII without edge whitespace, for the JSON round trip.
    fn printable_string() -> impl Strategy<Value = String> {
        "[ -~]{0,40}".prop_filter("sanitize must be identity", |s| {
            s.trim_matches([' ', '\t']) == s
        })
    }

    proptest! {
        /// Property: parsing the YAML scalar produced by `escape_yaml`
        /// yields the original string.
        #[test]
        fn prop_yaml_round_trip(value in benign_string()) {
            let escaped = escape_yaml(&value);
            let parsed: String = serde_yaml::from_str(&escaped)
                .expect("escaped scalar must parse");
            prop_assert_eq!(parsed, value);
        }

        /// Property: `escape_json` round-trips for printable input.
        #[test]
        fn prop_json_round_trip(value in printable_string()) {
            let escaped = escape_json(&value);
            let parsed: String = serde_json::from_str(&escaped)
                .expect("escaped JSON must parse");
            prop_assert_eq!(parsed, value);
        }

        /// Property: shell escaping either refuses (empty result) or
        /// produces a single-quoted token whose interior contains no
        /// injection patterns other than doubled quotes.
        #[test]
        fn prop_shell_escaping_is_quoted_or_refused(value in "[a-zA-Z0-9 ._';-]{1,30}") {
            let escaped = escape_shell(&value);
            if escaped.is_empty() {
                // Refusal is only acceptable for values that deserve it
                // or that sanitize to nothing.
                let sanitized = crate::security::sanitize_input(&value);
                prop_assert!(sanitized.is_empty() || contains_shell_injection(&sanitized));
            } else {
                prop_assert!(escaped.starts_with('\''));
                prop_assert!(escaped.ends_with('\''));
            }
        }

        /// Property: image labels only ever contain `[A-Za-z0-9._-]` and
        /// never start with a digit, dot, or hyphen.
        #[test]
        fn prop_image_labels_are_well_formed(value in "[ -~]{1,30}") {
            let label = crate::escaping::escape_image_label(&value);
            prop_assert!(label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
            if let Some(first) = label.chars().next() {
                prop_assert!(!first.is_ascii_digit() && first != '.' && first != '-');
            }
        }
    }
}
