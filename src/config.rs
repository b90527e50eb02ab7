//! # Router Configuration Module
//!
//! Flags that change how patterns are matched. They are read once when a
//! [`crate::Router`] is built; changing them afterwards requires a new router.
//!
//! ## Sources
//!
//! - [`RouterConfig::default()`] for the defaults below
//! - [`RouterConfig::from_env()`] for `ROUTEMATCH_*` environment variables
//! - [`RouterConfig::from_toml_str()`] / [`RouterConfig::from_toml_file()`]
//!
//! ## Environment Variables
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `ROUTEMATCH_SUFFIX_PATTERN_MATCH` | `use_suffix_pattern_match` | `false` |
//! | `ROUTEMATCH_TRAILING_SLASH_MATCH` | `use_trailing_slash_match` | `true` |
//! | `ROUTEMATCH_FILE_EXTENSIONS` | `file_extensions` (comma-separated) | empty |
//! | `ROUTEMATCH_CASE_SENSITIVE` | `case_sensitive` | `true` |
//! | `ROUTEMATCH_CACHE_PATTERNS` | `cache_patterns` | `true` |
//! | `ROUTEMATCH_CACHE_LIMIT` | `cache_limit` | `65536` |
//!
//! ## TOML
//!
//! ```toml
//! use_suffix_pattern_match = true
//! file_extensions = ["json", ".xml"]
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Number of cached compiled patterns after which the cache switches itself off.
pub const DEFAULT_CACHE_LIMIT: usize = 65_536;

/// Matching flags shared by every condition a router builds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Also try `pattern + ".*"` (or `pattern + ext` for each configured
    /// extension) so `/users` matches `/users.json`.
    pub use_suffix_pattern_match: bool,
    /// Also try `pattern + "/"` so `/users` matches `/users/`.
    pub use_trailing_slash_match: bool,
    /// Explicit extensions for suffix matching, normalised to start with `.`.
    pub file_extensions: Vec<String>,
    /// Match literal segments case-sensitively.
    pub case_sensitive: bool,
    /// Cache compiled patterns.
    pub cache_patterns: bool,
    /// Cache size after which caching is turned off.
    pub cache_limit: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            use_suffix_pattern_match: false,
            use_trailing_slash_match: true,
            file_extensions: Vec::new(),
            case_sensitive: true,
            cache_patterns: true,
            cache_limit: DEFAULT_CACHE_LIMIT,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let file_extensions = match env::var("ROUTEMATCH_FILE_EXTENSIONS") {
            Ok(val) => val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.file_extensions,
        };
        RouterConfig {
            use_suffix_pattern_match: env_flag(
                "ROUTEMATCH_SUFFIX_PATTERN_MATCH",
                defaults.use_suffix_pattern_match,
            ),
            use_trailing_slash_match: env_flag(
                "ROUTEMATCH_TRAILING_SLASH_MATCH",
                defaults.use_trailing_slash_match,
            ),
            file_extensions,
            case_sensitive: env_flag("ROUTEMATCH_CASE_SENSITIVE", defaults.case_sensitive),
            cache_patterns: env_flag("ROUTEMATCH_CACHE_PATTERNS", defaults.cache_patterns),
            cache_limit: env::var("ROUTEMATCH_CACHE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cache_limit),
        }
        .normalized()
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(text)?;
        Ok(config.normalized())
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Builder-style toggle for suffix pattern matching.
    #[must_use]
    pub fn with_suffix_pattern_match(mut self, enabled: bool) -> Self {
        self.use_suffix_pattern_match = enabled;
        self
    }

    /// Builder-style toggle for trailing slash matching.
    #[must_use]
    pub fn with_trailing_slash_match(mut self, enabled: bool) -> Self {
        self.use_trailing_slash_match = enabled;
        self
    }

    /// Builder-style setter for explicit file extensions.
    #[must_use]
    pub fn with_file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions = extensions.into_iter().map(Into::into).collect();
        self.normalized()
    }

    /// Builder-style toggle for case-sensitive matching.
    #[must_use]
    pub fn with_case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    fn normalized(mut self) -> Self {
        for ext in &mut self.file_extensions {
            if !ext.starts_with('.') {
                ext.insert(0, '.');
            }
        }
        self
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert!(!config.use_suffix_pattern_match);
        assert!(config.use_trailing_slash_match);
        assert!(config.case_sensitive);
        assert_eq!(config.cache_limit, DEFAULT_CACHE_LIMIT);
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = RouterConfig::from_toml_str(
            r#"
use_suffix_pattern_match = true
file_extensions = ["json", ".xml"]
"#,
        )
        .unwrap();
        assert!(config.use_suffix_pattern_match);
        assert!(config.use_trailing_slash_match);
        assert_eq!(config.file_extensions, vec![".json", ".xml"]);
    }

    #[test]
    fn test_toml_rejects_wrong_type() {
        let err = RouterConfig::from_toml_str("case_sensitive = \"maybe\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "use_trailing_slash_match = false").unwrap();
        writeln!(file, "cache_limit = 10").unwrap();
        let config = RouterConfig::from_toml_file(file.path()).unwrap();
        assert!(!config.use_trailing_slash_match);
        assert_eq!(config.cache_limit, 10);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RouterConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_builder_normalizes_extensions() {
        let config = RouterConfig::default().with_file_extensions(["html", ".txt"]);
        assert_eq!(config.file_extensions, vec![".html", ".txt"]);
    }
}
