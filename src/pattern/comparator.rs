//! Specificity ordering for patterns that match the same lookup path.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::{Ordering, Reverse};

/// `{...}` without a separator inside, counted as a single character when
/// measuring pattern length.
static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^/]+?\}").expect("valid variable regex"));

/// Counters describing how generic a pattern is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternInfo {
    /// Number of `{var}` placeholders
    pub uri_vars: usize,
    /// Number of `*` wildcards (excluding a trailing `.*`)
    pub single_wildcards: usize,
    /// Number of `**` wildcards
    pub double_wildcards: usize,
    /// Pattern is exactly `/**`
    pub catch_all: bool,
    /// Pattern ends in `/**` but is not the catch-all
    pub prefix: bool,
    /// `true` for the empty sentinel pattern
    pub empty: bool,
    length: usize,
}

impl PatternInfo {
    /// Analyse `pattern`.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let bytes = pattern.as_bytes();
        let mut uri_vars = 0;
        let mut single_wildcards = 0;
        let mut double_wildcards = 0;
        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b'{' => {
                    uri_vars += 1;
                    pos += 1;
                }
                b'*' => {
                    if pos + 1 < bytes.len() && bytes[pos + 1] == b'*' {
                        double_wildcards += 1;
                        pos += 2;
                    } else {
                        if pos > 0 && !(bytes[pos - 1] == b'.' && pos + 1 == bytes.len()) {
                            single_wildcards += 1;
                        }
                        pos += 1;
                    }
                }
                _ => pos += 1,
            }
        }

        let catch_all = pattern == "/**";
        let prefix = !catch_all && pattern.ends_with("/**");
        let length = VARIABLE_PATTERN.replace_all(pattern, "#").chars().count();

        Self {
            uri_vars,
            single_wildcards,
            double_wildcards,
            catch_all,
            prefix,
            empty: pattern.is_empty(),
            length,
        }
    }

    /// `{var}` + `*` + 2 × `**`
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.uri_vars + self.single_wildcards + 2 * self.double_wildcards
    }

    /// Pattern length with each `{...}` counted as one character.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    fn is_least_specific(&self) -> bool {
        self.empty || self.catch_all
    }
}

/// Orders patterns that all match `path`, most specific first.
///
/// Every pattern is reduced to a [`SpecificityKey`] and keys compare
/// lexicographically, so the order is a strict weak ordering: ties are
/// reported as `Equal` and never broken by input order.
///
/// Only meaningful for patterns already known to match the path.
#[derive(Debug, Clone, Copy)]
pub struct SpecificityComparator<'a> {
    path: &'a str,
}

/// Sort key of one pattern relative to a lookup path. Smaller is closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpecificityKey {
    least_specific: bool,
    not_exact: bool,
    prefix: bool,
    total_count: usize,
    length: Reverse<usize>,
    single_wildcards: usize,
    uri_vars: usize,
}

impl<'a> SpecificityComparator<'a> {
    /// Comparator for the given lookup path.
    #[must_use]
    pub fn new(path: &'a str) -> Self {
        Self { path }
    }

    /// Rank `pattern`:
    ///
    /// 1. the empty sentinel and `/**` come last
    /// 2. a pattern equal to the path comes first
    /// 3. prefix patterns (`/x/**`) follow all others and order by length
    /// 4. fewer wildcards, then longer, then fewer `*`, then fewer `{var}`
    #[must_use]
    pub fn key(&self, pattern: &str) -> SpecificityKey {
        let info = PatternInfo::new(pattern);
        let least_specific = info.is_least_specific();
        let not_exact = least_specific || pattern != self.path;
        if least_specific || !not_exact {
            return SpecificityKey {
                least_specific,
                not_exact,
                prefix: false,
                total_count: 0,
                length: Reverse(0),
                single_wildcards: 0,
                uri_vars: 0,
            };
        }
        if info.prefix {
            return SpecificityKey {
                least_specific,
                not_exact,
                prefix: true,
                total_count: 0,
                length: Reverse(info.length),
                single_wildcards: 0,
                uri_vars: 0,
            };
        }
        SpecificityKey {
            least_specific,
            not_exact,
            prefix: false,
            total_count: info.total_count(),
            length: Reverse(info.length),
            single_wildcards: info.single_wildcards,
            uri_vars: info.uri_vars,
        }
    }

    /// `Less` when `a` is the closer match.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }

    /// Sort `patterns` in place, closest match first.
    pub fn sort<S: AsRef<str>>(&self, patterns: &mut [S]) {
        patterns.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }
}
