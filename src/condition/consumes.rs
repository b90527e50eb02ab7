use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::expression::{same_set, write_joined};
use super::RequestCondition;
use crate::error::PatternError;
use crate::request::Request;

/// Content type assumed when a request carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A `type/subtype` pair, parameters dropped, lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    kind: String,
    subtype: String,
}

impl MediaType {
    /// Parse `type/subtype[;params]`. A bare `*` means `*/*`.
    pub fn parse(value: &str) -> Result<Self, PatternError> {
        let invalid = || PatternError::InvalidMediaType {
            value: value.to_string(),
        };
        let essence = value.split(';').next().unwrap_or_default().trim();
        if essence == "*" {
            return Ok(Self::new("*", "*"));
        }
        let (kind, subtype) = essence.split_once('/').ok_or_else(invalid)?;
        let valid = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+*".contains(c))
        };
        if !valid(kind) || !valid(subtype) || (kind == "*" && subtype != "*") {
            return Err(invalid());
        }
        Ok(Self::new(kind, subtype))
    }

    fn new(kind: &str, subtype: &str) -> Self {
        Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    #[must_use]
    pub fn is_wildcard_type(&self) -> bool {
        self.kind == "*"
    }

    /// `*` or `*+suffix`.
    #[must_use]
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == "*" || self.subtype.starts_with("*+")
    }

    /// `true` if `other` falls within this media type: `text/*` includes
    /// `text/plain`, `application/*+xml` includes `application/soap+xml`.
    #[must_use]
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        if self.kind != other.kind {
            return false;
        }
        if self.subtype == other.subtype || self.subtype == "*" {
            return true;
        }
        match self.subtype.strip_prefix("*+") {
            Some(suffix) => other
                .subtype
                .rsplit_once('+')
                .is_some_and(|(_, other_suffix)| other_suffix == suffix),
            None => false,
        }
    }

    /// 0 for `*/*`, 1 for `type/*`, 2 for a concrete type.
    fn specificity(&self) -> u8 {
        if self.is_wildcard_type() {
            0
        } else if self.is_wildcard_subtype() {
            1
        } else {
            2
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)
    }
}

/// A media type, possibly negated with `!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaTypeExpression {
    media_type: MediaType,
    negated: bool,
}

impl MediaTypeExpression {
    pub fn parse(expression: &str) -> Result<Self, PatternError> {
        let expression = expression.trim();
        let (negated, value) = match expression.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, expression),
        };
        Ok(Self {
            media_type: MediaType::parse(value)?,
            negated,
        })
    }

    #[must_use]
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    fn matches(&self, content_type: &MediaType) -> bool {
        self.media_type.includes(content_type) != self.negated
    }

    /// More specific media type first.
    fn compare(&self, other: &Self) -> Ordering {
        other
            .media_type
            .specificity()
            .cmp(&self.media_type.specificity())
    }
}

impl fmt::Display for MediaTypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "{}", self.media_type)
    }
}

/// Media types a registration accepts as request body.
///
/// Expressions are kept most specific first.
#[derive(Debug, Clone, Default)]
pub struct ConsumesCondition {
    expressions: Vec<MediaTypeExpression>,
}

impl ConsumesCondition {
    /// Fails with [`PatternError::InvalidMediaType`] on a malformed entry.
    pub fn new<I, S>(expressions: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed: Vec<MediaTypeExpression> = Vec::new();
        for expr in expressions {
            let expr = MediaTypeExpression::parse(expr.as_ref())?;
            if !parsed.contains(&expr) {
                parsed.push(expr);
            }
        }
        Ok(Self::from_expressions(parsed))
    }

    fn from_expressions(mut expressions: Vec<MediaTypeExpression>) -> Self {
        expressions.sort_by(MediaTypeExpression::compare);
        Self { expressions }
    }

    #[must_use]
    pub fn expressions(&self) -> &[MediaTypeExpression] {
        &self.expressions
    }

    /// Non-negated media types, for error reporting.
    #[must_use]
    pub fn consumable_media_types(&self) -> Vec<String> {
        self.expressions
            .iter()
            .filter(|e| !e.negated)
            .map(|e| e.media_type.to_string())
            .collect()
    }
}

impl RequestCondition for ConsumesCondition {
    /// The inner scope replaces the outer one unless it is empty.
    fn combine(&self, other: &Self) -> Result<Self, PatternError> {
        Ok(if other.expressions.is_empty() {
            self.clone()
        } else {
            other.clone()
        })
    }

    fn get_matching_condition(&self, request: &Request) -> Option<Self> {
        if self.expressions.is_empty() {
            return Some(self.clone());
        }
        let content_type =
            MediaType::parse(request.content_type().unwrap_or(DEFAULT_CONTENT_TYPE)).ok()?;
        let matching: Vec<MediaTypeExpression> = self
            .expressions
            .iter()
            .filter(|e| e.matches(&content_type))
            .cloned()
            .collect();
        if matching.is_empty() {
            None
        } else {
            Some(Self::from_expressions(matching))
        }
    }

    fn compare_to(&self, other: &Self, _request: &Request) -> Ordering {
        match (self.expressions.first(), other.expressions.first()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a
                .compare(b)
                .then_with(|| other.expressions.len().cmp(&self.expressions.len())),
        }
    }

    fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

impl PartialEq for ConsumesCondition {
    fn eq(&self, other: &Self) -> bool {
        same_set(&self.expressions, &other.expressions)
    }
}

impl Eq for ConsumesCondition {}

impl Hash for ConsumesCondition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut keys: Vec<String> = self.expressions.iter().map(ToString::to_string).collect();
        keys.sort_unstable();
        keys.hash(state);
    }
}

impl fmt::Display for ConsumesCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.expressions, " || ")
    }
}
