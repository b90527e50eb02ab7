use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::expression::{same_set, write_joined};
use super::RequestCondition;
use crate::error::PatternError;
use crate::pattern::{PathMatcher, PATH_SEPARATOR};
use crate::request::Request;

/// Disjunction of URL patterns for one registration.
///
/// A set built from no patterns holds the single empty-string pattern. That
/// sentinel matches every lookup path and ranks below every real pattern.
#[derive(Clone)]
pub struct PatternsCondition {
    patterns: Vec<String>,
    matcher: Arc<PathMatcher>,
}

impl PatternsCondition {
    /// Build a pattern set. Non-empty patterns get a leading `/`; duplicates
    /// are dropped; each pattern is compiled once to reject invalid syntax.
    pub fn new<I, S>(patterns: I, matcher: Arc<PathMatcher>) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for pattern in patterns {
            let pattern = prepend_leading_slash(pattern.as_ref());
            if !pattern.is_empty() {
                matcher.compile(&pattern)?;
            }
            if !normalized.contains(&pattern) {
                normalized.push(pattern);
            }
        }
        if normalized.is_empty() {
            normalized.push(String::new());
        }
        Ok(Self {
            patterns: normalized,
            matcher,
        })
    }

    /// The sentinel set that matches every path.
    #[must_use]
    pub fn empty(matcher: Arc<PathMatcher>) -> Self {
        Self {
            patterns: vec![String::new()],
            matcher,
        }
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// `true` for the sentinel set.
    #[must_use]
    pub fn is_empty_path_mapping(&self) -> bool {
        self.patterns.len() == 1 && self.patterns[0].is_empty()
    }

    /// Patterns without wildcards or variables, usable as exact lookup keys.
    #[must_use]
    pub fn direct_paths(&self) -> Vec<&str> {
        self.patterns
            .iter()
            .filter(|p| !p.is_empty() && !self.matcher.is_pattern(p))
            .map(String::as_str)
            .collect()
    }

    /// Every pattern that matches `lookup_path`, closest match first.
    ///
    /// For each pattern the checks run in order: exact equality, suffix
    /// variant, the pattern itself, trailing slash variant. The variant that
    /// matched is what is returned (`/users` may come back as `/users.*`).
    #[must_use]
    pub fn get_matching_patterns(&self, lookup_path: &str) -> Vec<String> {
        if self.is_empty_path_mapping() {
            return self.patterns.clone();
        }
        let mut matches: Vec<String> = self
            .patterns
            .iter()
            .filter_map(|p| self.get_matching_pattern(p, lookup_path))
            .collect();
        if matches.len() > 1 {
            self.matcher.comparator(lookup_path).sort(&mut matches);
        }
        matches
    }

    fn get_matching_pattern(&self, pattern: &str, lookup_path: &str) -> Option<String> {
        if pattern == lookup_path {
            return Some(pattern.to_string());
        }
        let config = self.matcher.config();
        if config.use_suffix_pattern_match {
            if !config.file_extensions.is_empty() && lookup_path.contains('.') {
                for ext in &config.file_extensions {
                    let candidate = format!("{}{}", pattern, ext);
                    if self.matcher.matches(&candidate, lookup_path) {
                        return Some(candidate);
                    }
                }
            } else if !pattern.contains('.') {
                let candidate = format!("{}.*", pattern);
                if self.matcher.matches(&candidate, lookup_path) {
                    return Some(candidate);
                }
            }
        }
        if self.matcher.matches(pattern, lookup_path) {
            return Some(pattern.to_string());
        }
        if config.use_trailing_slash_match && !pattern.ends_with(PATH_SEPARATOR) {
            let candidate = format!("{}{}", pattern, PATH_SEPARATOR);
            if self.matcher.matches(&candidate, lookup_path) {
                return Some(candidate);
            }
        }
        None
    }
}

impl RequestCondition for PatternsCondition {
    /// Cross product of both sets. The sentinel on either side is neutral.
    fn combine(&self, other: &Self) -> Result<Self, PatternError> {
        if other.is_empty_path_mapping() {
            return Ok(self.clone());
        }
        if self.is_empty_path_mapping() {
            return Ok(other.clone());
        }
        let mut combined = Vec::with_capacity(self.patterns.len() * other.patterns.len());
        for p1 in &self.patterns {
            for p2 in &other.patterns {
                let pattern = self.matcher.combine(p1, p2)?;
                if !combined.contains(&pattern) {
                    combined.push(pattern);
                }
            }
        }
        Ok(Self {
            patterns: combined,
            matcher: Arc::clone(&self.matcher),
        })
    }

    fn get_matching_condition(&self, request: &Request) -> Option<Self> {
        if self.is_empty_path_mapping() {
            return Some(self.clone());
        }
        let matches = self.get_matching_patterns(request.lookup_path());
        if matches.is_empty() {
            return None;
        }
        Some(Self {
            patterns: matches,
            matcher: Arc::clone(&self.matcher),
        })
    }

    /// Pairwise comparison of the sorted patterns. When one list runs out
    /// first, the one with patterns left over is the weaker match.
    fn compare_to(&self, other: &Self, request: &Request) -> Ordering {
        let comparator = self.matcher.comparator(request.lookup_path());
        let mut ours = self.patterns.iter();
        let mut theirs = other.patterns.iter();
        loop {
            match (ours.next(), theirs.next()) {
                (Some(a), Some(b)) => {
                    let result = comparator.compare(a, b);
                    if result != Ordering::Equal {
                        return result;
                    }
                }
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (None, None) => return Ordering::Equal,
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.is_empty_path_mapping()
    }
}

impl PartialEq for PatternsCondition {
    fn eq(&self, other: &Self) -> bool {
        same_set(&self.patterns, &other.patterns)
    }
}

impl Eq for PatternsCondition {}

impl Hash for PatternsCondition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<&String> = self.patterns.iter().collect();
        sorted.sort_unstable();
        sorted.hash(state);
    }
}

impl fmt::Debug for PatternsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternsCondition")
            .field(&self.patterns)
            .finish()
    }
}

impl fmt::Display for PatternsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.patterns, " || ")
    }
}

fn prepend_leading_slash(pattern: &str) -> String {
    if pattern.is_empty() || pattern.starts_with(PATH_SEPARATOR) {
        pattern.to_string()
    } else {
        format!("{}{}", PATH_SEPARATOR, pattern)
    }
}
