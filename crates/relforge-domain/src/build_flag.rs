//! Build flags for conditional compilation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of build flags allowed on a configuration.
pub const MAX_BUILD_FLAGS: usize = 10;

/// Maximum length of a build-flag name.
pub const MAX_FLAG_NAME_LEN: usize = 50;

/// Maximum length of a build-flag description.
pub const MAX_FLAG_DESCRIPTION_LEN: usize = 200;

/// A named build flag with a short description.
///
/// Names are unique within a configuration; the grammar is enforced by
/// the validator, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildFlag {
    /// Flag name passed to the build.
    pub name: String,
    /// What the flag does.
    #[serde(default)]
    pub description: String,
}

impl BuildFlag {
    /// Create a build flag.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Commonly useful build flags offered as form suggestions.
    pub fn common_flags() -> Vec<BuildFlag> {
        vec![
            BuildFlag::new("netgo", "Use the pure-Go network stack"),
            BuildFlag::new("osusergo", "Use the pure-Go user lookup"),
            BuildFlag::new("sqlite_omit_load_extension", "Omit SQLite load extension"),
            BuildFlag::new("sqlite_unlock_notify", "Enable SQLite unlock notify"),
            BuildFlag::new("inotify", "Enable inotify support"),
            BuildFlag::new("kqueue", "Enable kqueue support"),
        ]
    }
}

impl fmt::Display for BuildFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_name() {
        let flag = BuildFlag::new("netgo", "whatever");
        assert_eq!(flag.to_string(), "netgo");
    }

    #[test]
    fn common_flags_fit_the_limit() {
        let flags = BuildFlag::common_flags();
        assert!(flags.len() <= MAX_BUILD_FLAGS);
        for flag in &flags {
            assert!(flag.name.len() <= MAX_FLAG_NAME_LEN);
            assert!(flag.description.len() <= MAX_FLAG_DESCRIPTION_LEN);
        }
    }
}
