//! Security filters shared by every field validator.

use once_cell::sync::Lazy;
use regex::Regex;

/// Names rejected for identifiers: Windows device names, toolchain
/// reserved tokens, and common Unix system directories.
pub static RESERVED_NAMES: &[&str] = &[
    // Windows device names
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
    // Toolchain reserved tokens
    "go", "test", "vendor", "internal", "main", "init", "close", "copy",
    // Unix system directories
    "etc", "usr", "var", "bin", "sbin", "lib", "lib64", "dev", "proc", "sys", "root", "home",
    "tmp", "opt", "srv", "mnt", "media", "run",
];

/// File extensions rejected on binary names.
pub static DANGEROUS_EXTENSIONS: &[&str] = &[
    ".exe", ".bat", ".cmd", ".com", ".pif", ".scr", ".vbs", ".js", ".jar", ".sh", ".ps1", ".py",
    ".rb", ".pl", ".php",
];

/// Shell metacharacters that are never allowed in names or paths.
pub static SHELL_METACHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[;&|<>"'$`\\]"#).expect("shell metachar pattern"));

/// Whether `name` is reserved, compared case-insensitively.
pub fn is_reserved_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_NAMES.contains(&lower.as_str())
}

/// Whether `name` carries a dangerous executable extension.
pub fn has_dangerous_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    DANGEROUS_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Whether `value` contains any shell metacharacter.
pub fn contains_shell_metacharacters(value: &str) -> bool {
    SHELL_METACHARS.is_match(value)
}

/// Whether `value` matches any shell-injection pattern.
///
/// Single metacharacters, command substitution openers, and a few
/// literal command fragments are all grounds for rejection; there is no
/// attempt to escape such values anywhere in the system.
pub fn contains_shell_injection(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    const PATTERNS: &[&str] = &[
        ";", "|", "&", "<", ">", "`", "$(", "${", "rm ", ">/dev/", "2>&1",
    ];
    PATTERNS.iter().any(|p| lower.contains(p))
}

/// Strip C0 control characters other than `\t`, `\n`, `\r`, drop NUL
/// bytes, and trim leading/trailing spaces and tabs while preserving
/// internal newlines.
pub fn sanitize_input(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .filter(|c| *c != '\0')
        .collect();
    cleaned.trim_matches([' ', '\t']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_case_insensitive() {
        assert!(is_reserved_name("con"));
        assert!(is_reserved_name("CON"));
        assert!(is_reserved_name("Vendor"));
        assert!(!is_reserved_name("console"));
    }

    #[test]
    fn dangerous_extensions_match_suffixes_only() {
        assert!(has_dangerous_extension("tool.exe"));
        assert!(has_dangerous_extension("run.SH"));
        assert!(!has_dangerous_extension("shexe"));
        assert!(!has_dangerous_extension("tool.txt"));
    }

    #[test]
    fn injection_patterns_cover_command_fragments() {
        assert!(contains_shell_injection("a;b"));
        assert!(contains_shell_injection("a|b"));
        assert!(contains_shell_injection("$(whoami)"));
        assert!(contains_shell_injection("${HOME}"));
        assert!(contains_shell_injection("rm -rf"));
        assert!(contains_shell_injection("x 2>&1"));
        assert!(!contains_shell_injection("harmless-value"));
        assert!(!contains_shell_injection("warm"));
    }

    #[test]
    fn sanitize_strips_controls_and_trims_edges() {
        assert_eq!(sanitize_input("  hello\t"), "hello");
        assert_eq!(sanitize_input("a\u{0007}b"), "ab");
        assert_eq!(sanitize_input("a\0b"), "ab");
        assert_eq!(sanitize_input("line1\nline2"), "line1\nline2");
        assert_eq!(sanitize_input("\tpadded\n"), "padded\n");
    }
}
