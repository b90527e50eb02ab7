use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::comparator::SpecificityComparator;
use super::compiled::CompiledPattern;
use super::{UriVariables, PATH_SEPARATOR};
use crate::config::RouterConfig;
use crate::error::PatternError;

/// Ant-style path matcher shared by every condition of a router.
///
/// Compiled patterns are cached by source text. The cache turns itself off
/// once it holds more than `cache_limit` entries, which only happens when
/// patterns are generated at runtime.
#[derive(Debug)]
pub struct PathMatcher {
    config: RouterConfig,
    cache: DashMap<String, Arc<CompiledPattern>>,
    cache_enabled: AtomicBool,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl PathMatcher {
    /// Matcher using the given configuration.
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        let cache_enabled = AtomicBool::new(config.cache_patterns);
        Self {
            config,
            cache: DashMap::new(),
            cache_enabled,
        }
    }

    /// Configuration this matcher was built with.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Number of cached compiled patterns.
    #[must_use]
    pub fn cached_patterns(&self) -> usize {
        self.cache.len()
    }

    /// Compile `pattern`, going through the cache when enabled.
    pub fn compile(&self, pattern: &str) -> Result<Arc<CompiledPattern>, PatternError> {
        let caching = self.cache_enabled.load(Ordering::Relaxed);
        if caching {
            if let Some(hit) = self.cache.get(pattern) {
                return Ok(Arc::clone(hit.value()));
            }
        }

        let compiled = Arc::new(CompiledPattern::compile(pattern, self.config.case_sensitive)?);

        if caching {
            if self.cache.len() >= self.config.cache_limit {
                // Patterns are being generated at runtime; a growing cache
                // would never get a hit anyway.
                self.cache_enabled.store(false, Ordering::Relaxed);
                self.cache.clear();
                warn!(
                    cache_limit = self.config.cache_limit,
                    "Pattern cache limit reached, caching disabled"
                );
            } else {
                self.cache.insert(pattern.to_string(), Arc::clone(&compiled));
            }
        }
        Ok(compiled)
    }

    /// `true` if `pattern` contains a wildcard or a URI variable.
    #[must_use]
    pub fn is_pattern(&self, pattern: &str) -> bool {
        pattern.contains(&['*', '?', '{'][..])
    }

    /// Test `path` against `pattern`. An invalid pattern never matches.
    #[must_use]
    pub fn matches(&self, pattern: &str, path: &str) -> bool {
        match self.compile(pattern) {
            Ok(compiled) => compiled.matches(path),
            Err(err) => {
                warn!(pattern = %pattern, error = %err, "Invalid pattern never matches");
                false
            }
        }
    }

    /// Captured URI variables of `pattern` applied to `path`.
    pub fn extract_uri_template_variables(
        &self,
        pattern: &str,
        path: &str,
    ) -> Result<UriVariables, PatternError> {
        self.compile(pattern)?
            .captures(path)
            .ok_or_else(|| PatternError::NoMatch {
                pattern: pattern.to_string(),
                path: path.to_string(),
            })
    }

    /// Combine an outer-scope pattern with an inner-scope one.
    ///
    /// | outer | inner | result |
    /// |---|---|---|
    /// | `/hotels` | (empty) | `/hotels` |
    /// | `/hotels` | `/bookings` | `/hotels/bookings` |
    /// | `/hotels/*` | `/bookings` | `/hotels/bookings` |
    /// | `/hotels/**` | `/bookings` | `/hotels/**/bookings` |
    /// | `/*.html` | `/hotel` | `/hotel.html` |
    /// | `/*.*` | `/*.html` | `/*.html` |
    /// | `/{foo}` | `/bar` | `/{foo}/bar` |
    /// | `/*.html` | `/*.txt` | error |
    pub fn combine(&self, pattern1: &str, pattern2: &str) -> Result<String, PatternError> {
        if pattern1.is_empty() && pattern2.is_empty() {
            return Ok(String::new());
        }
        if pattern1.is_empty() {
            return Ok(pattern2.to_string());
        }
        if pattern2.is_empty() {
            return Ok(pattern1.to_string());
        }

        let p1_has_var = pattern1.contains('{');
        if pattern1 != pattern2 && !p1_has_var && self.matches(pattern1, pattern2) {
            // /* + /hotel -> /hotel ; "/*.*" + "/*.html" -> /*.html
            return Ok(pattern2.to_string());
        }

        // /hotels/* + /booking -> /hotels/booking
        if let Some(stem) = pattern1.strip_suffix("/*") {
            return Ok(concat(stem, pattern2));
        }

        // /hotels/** + /booking -> /hotels/**/booking
        if pattern1.ends_with("/**") {
            return Ok(concat(pattern1, pattern2));
        }

        let Some(star_dot) = pattern1.find("*.") else {
            return Ok(concat(pattern1, pattern2));
        };
        if p1_has_var {
            return Ok(concat(pattern1, pattern2));
        }

        let ext1 = &pattern1[star_dot + 1..];
        if ext1 == "." {
            return Ok(concat(pattern1, pattern2));
        }
        let (file2, ext2) = match pattern2.find('.') {
            Some(dot) => (&pattern2[..dot], &pattern2[dot..]),
            None => (pattern2, ""),
        };
        let ext1_all = ext1 == ".*" || ext1.is_empty();
        let ext2_all = ext2 == ".*" || ext2.is_empty();
        if !ext1_all && !ext2_all {
            return Err(PatternError::IncompatibleCombine {
                first: pattern1.to_string(),
                second: pattern2.to_string(),
            });
        }
        let ext = if ext1_all { ext2 } else { ext1 };
        let combined = format!("{}{}", file2, ext);
        debug!(pattern1 = %pattern1, pattern2 = %pattern2, combined = %combined, "Combined patterns by extension");
        Ok(combined)
    }

    /// Specificity comparator for `path`.
    #[must_use]
    pub fn comparator<'a>(&self, path: &'a str) -> SpecificityComparator<'a> {
        SpecificityComparator::new(path)
    }
}

fn concat(path1: &str, path2: &str) -> String {
    let ends = path1.ends_with(PATH_SEPARATOR);
    let starts = path2.starts_with(PATH_SEPARATOR);
    match (ends, starts) {
        (true, true) => format!("{}{}", path1, &path2[1..]),
        (true, false) | (false, true) => format!("{}{}", path1, path2),
        (false, false) => format!("{}{}{}", path1, PATH_SEPARATOR, path2),
    }
}
