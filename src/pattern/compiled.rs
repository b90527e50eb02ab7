//! Compiled form of an Ant-style pattern.
//!
//! A pattern is split on `/` into segments. Each segment is one of:
//!
//! - a literal (`users`), compared directly
//! - `**`, which spans zero or more path segments
//! - a glob (`*.html`, `f?o`, `{id}`, `{id:\d+}`), compiled to an anchored
//!   regex with one named capture group per URI variable

use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

use super::{UriVariables, PATH_SEPARATOR};
use crate::error::PatternError;

#[derive(Debug)]
pub(crate) enum Segment {
    Literal(String),
    DoubleWildcard,
    Glob(GlobSegment),
}

#[derive(Debug)]
pub(crate) struct GlobSegment {
    regex: Regex,
    /// The segment is exactly `*`.
    single_star: bool,
    /// Variable names in declaration order; capture group `v{i}` holds the
    /// value of `variables[i]`.
    variables: SmallVec<[Arc<str>; 2]>,
}

/// A pattern compiled for repeated matching against lookup paths.
#[derive(Debug)]
pub struct CompiledPattern {
    raw: String,
    leading_separator: bool,
    trailing_separator: bool,
    segments: Vec<Segment>,
    case_sensitive: bool,
}

impl CompiledPattern {
    /// Compile `pattern`. Fails on unbalanced braces, malformed variable
    /// names, duplicate variables or invalid `{name:regex}` constraints.
    pub fn compile(pattern: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut seen: Vec<Arc<str>> = Vec::new();

        for token in tokenize(pattern) {
            if token == "**" {
                segments.push(Segment::DoubleWildcard);
            } else if token.contains(&['?', '*', '{', '}'][..]) {
                let glob = compile_glob(pattern, token, case_sensitive)?;
                for name in &glob.variables {
                    if seen.contains(name) {
                        return Err(PatternError::invalid(
                            pattern,
                            format!("variable '{}' is declared more than once", name),
                        ));
                    }
                    seen.push(Arc::clone(name));
                }
                segments.push(Segment::Glob(glob));
            } else {
                segments.push(Segment::Literal(token.to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            leading_separator: pattern.starts_with(PATH_SEPARATOR),
            trailing_separator: pattern.ends_with(PATH_SEPARATOR),
            segments,
            case_sensitive,
        })
    }

    /// The source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of every URI variable, in declaration order.
    #[must_use]
    pub fn variable_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Glob(g) => Some(g.variables.iter().map(|v| v.as_ref())),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// `true` if the pattern contains no wildcard and no variable.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Test `path` against this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.do_match(path, None)
    }

    /// Test `path` and, on success, return the captured URI variables.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<UriVariables> {
        let mut vars = UriVariables::new();
        self.do_match(path, Some(&mut vars)).then_some(vars)
    }

    /// Segment-wise Ant matching: literal/glob segments are consumed from
    /// the front until the first `**`, then from the back until the last
    /// `**`, and the remaining `**`-separated groups are searched for in
    /// the unconsumed middle of the path.
    fn do_match(&self, path: &str, mut vars: Option<&mut UriVariables>) -> bool {
        if path.starts_with(PATH_SEPARATOR) != self.leading_separator {
            return false;
        }

        let patt = &self.segments;
        let dirs: Vec<&str> = tokenize(path).collect();
        if patt.is_empty() {
            return dirs.is_empty() && self.trailing_separator == path.ends_with(PATH_SEPARATOR);
        }

        let mut patt_start: isize = 0;
        let mut patt_end: isize = patt.len() as isize - 1;
        let mut path_start: isize = 0;
        let mut path_end: isize = dirs.len() as isize - 1;

        // Match all elements up to the first **
        while patt_start <= patt_end && path_start <= path_end {
            let seg = &patt[patt_start as usize];
            if matches!(seg, Segment::DoubleWildcard) {
                break;
            }
            if !self.match_segment(seg, dirs[path_start as usize], vars.as_deref_mut()) {
                return false;
            }
            patt_start += 1;
            path_start += 1;
        }

        if path_start > path_end {
            // Path exhausted: only the trailing * or **'s may remain
            if patt_start > patt_end {
                return self.trailing_separator == path.ends_with(PATH_SEPARATOR);
            }
            if patt_start == patt_end
                && is_single_star(&patt[patt_start as usize])
                && path.ends_with(PATH_SEPARATOR)
            {
                return true;
            }
            return patt[patt_start as usize..=patt_end as usize]
                .iter()
                .all(|s| matches!(s, Segment::DoubleWildcard));
        } else if patt_start > patt_end {
            // Pattern exhausted before the path
            return false;
        }

        // Match from the end up to the last **; captures are held back so
        // the result stays in declaration order
        let mut tail = UriVariables::new();
        while patt_start <= patt_end && path_start <= path_end {
            let seg = &patt[patt_end as usize];
            if matches!(seg, Segment::DoubleWildcard) {
                break;
            }
            let mut seg_vars = UriVariables::new();
            let scratch = vars.as_ref().map(|_| &mut seg_vars);
            if !self.match_segment(seg, dirs[path_end as usize], scratch) {
                return false;
            }
            tail.insert_many(0, seg_vars);
            if patt_end as usize == patt.len() - 1
                && self.trailing_separator != path.ends_with(PATH_SEPARATOR)
            {
                return false;
            }
            patt_end -= 1;
            path_end -= 1;
        }

        let matched = 'middle: {
            if path_start > path_end {
                break 'middle patt[patt_start as usize..=patt_end as usize]
                    .iter()
                    .all(|s| matches!(s, Segment::DoubleWildcard));
            }

            while patt_start != patt_end && path_start <= path_end {
                let next_double = (patt_start + 1..=patt_end)
                    .find(|&i| matches!(patt[i as usize], Segment::DoubleWildcard));
                let Some(next_double) = next_double else {
                    break;
                };
                if next_double == patt_start + 1 {
                    // '**/**' collapses
                    patt_start += 1;
                    continue;
                }

                let patt_len = next_double - patt_start - 1;
                let str_len = path_end - path_start + 1;
                let mut found: Option<isize> = None;

                'outer: for i in 0..=(str_len - patt_len) {
                    let mut attempt = UriVariables::new();
                    for j in 0..patt_len {
                        let seg = &patt[(patt_start + j + 1) as usize];
                        let dir = dirs[(path_start + i + j) as usize];
                        let scratch = vars.as_ref().map(|_| &mut attempt);
                        if !self.match_segment(seg, dir, scratch) {
                            continue 'outer;
                        }
                    }
                    if let Some(v) = vars.as_deref_mut() {
                        v.extend(attempt);
                    }
                    found = Some(path_start + i);
                    break;
                }

                match found {
                    Some(idx) => {
                        patt_start = next_double;
                        path_start = idx + patt_len;
                    }
                    None => break 'middle false,
                }
            }

            patt[patt_start as usize..=patt_end as usize]
                .iter()
                .all(|s| matches!(s, Segment::DoubleWildcard))
        };

        if matched {
            if let Some(v) = vars {
                v.extend(tail);
            }
        }
        matched
    }

    fn match_segment(&self, seg: &Segment, dir: &str, vars: Option<&mut UriVariables>) -> bool {
        match seg {
            Segment::DoubleWildcard => true,
            Segment::Literal(lit) => {
                if self.case_sensitive {
                    lit == dir
                } else {
                    lit.eq_ignore_ascii_case(dir)
                }
            }
            Segment::Glob(glob) => {
                let Some(caps) = glob.regex.captures(dir) else {
                    return false;
                };
                if let Some(vars) = vars {
                    for (i, name) in glob.variables.iter().enumerate() {
                        let value = caps
                            .name(&format!("v{}", i))
                            .map(|m| m.as_str().to_string())
                            .unwrap_or_default();
                        vars.push((Arc::clone(name), value));
                    }
                }
                true
            }
        }
    }
}

fn is_single_star(seg: &Segment) -> bool {
    match seg {
        Segment::Glob(g) => g.single_star,
        _ => false,
    }
}

/// Split on `/`, dropping empty tokens.
pub(crate) fn tokenize(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

fn compile_glob(pattern: &str, token: &str, case_sensitive: bool) -> Result<GlobSegment, PatternError> {
    let mut re = String::with_capacity(token.len() + 8);
    re.push_str(if case_sensitive { "(?s)^" } else { "(?si)^" });

    let mut variables: SmallVec<[Arc<str>; 2]> = SmallVec::new();
    let mut literal = String::new();
    let mut chars = token.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '?' | '*' => {
                re.push_str(&regex::escape(&literal));
                literal.clear();
                re.push_str(if c == '?' { "." } else { ".*" });
            }
            '{' => {
                re.push_str(&regex::escape(&literal));
                literal.clear();

                // Find the matching '}', allowing one level of nesting for
                // regex quantifiers such as {id:\d{2}}.
                let mut depth = 1;
                let mut end = None;
                for (p, ch) in chars.by_ref() {
                    match ch {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                end = Some(p);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let Some(end) = end else {
                    return Err(PatternError::invalid(pattern, "unbalanced '{'"));
                };

                let body = &token[pos + 1..end];
                let (name, constraint) = match body.split_once(':') {
                    Some((name, constraint)) => (name, Some(constraint)),
                    None => (body, None),
                };
                if name.is_empty() {
                    return Err(PatternError::invalid(pattern, "empty variable name"));
                }
                if !name
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
                {
                    return Err(PatternError::invalid(
                        pattern,
                        format!("illegal variable name '{}'", name),
                    ));
                }
                if variables.iter().any(|v| v.as_ref() == name) {
                    return Err(PatternError::invalid(
                        pattern,
                        format!("variable '{}' is declared more than once", name),
                    ));
                }

                let group = format!("v{}", variables.len());
                match constraint {
                    Some(constraint) => {
                        if constraint.is_empty() {
                            return Err(PatternError::invalid(
                                pattern,
                                format!("empty constraint for variable '{}'", name),
                            ));
                        }
                        Regex::new(constraint).map_err(|e| {
                            PatternError::invalid(
                                pattern,
                                format!("invalid constraint for '{}': {}", name, e),
                            )
                        })?;
                        re.push_str(&format!("(?P<{}>{})", group, constraint));
                    }
                    None => re.push_str(&format!("(?P<{}>.*)", group)),
                }
                variables.push(Arc::from(name));
            }
            '}' => return Err(PatternError::invalid(pattern, "unbalanced '}'")),
            _ => literal.push(c),
        }
    }
    re.push_str(&regex::escape(&literal));
    re.push('$');

    let regex = Regex::new(&re).map_err(|e| PatternError::invalid(pattern, e.to_string()))?;
    Ok(GlobSegment {
        regex,
        single_star: token == "*",
        variables,
    })
}
