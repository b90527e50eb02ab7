use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::expression::{push_unique, same_set, write_joined, NameValueExpression};
use super::RequestCondition;
use crate::error::PatternError;
use crate::request::Request;

/// Query parameter expressions; every one must hold.
#[derive(Debug, Clone, Default)]
pub struct ParamsCondition {
    expressions: Vec<NameValueExpression>,
}

impl ParamsCondition {
    #[must_use]
    pub fn new<I, S>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for expr in expressions {
            push_unique(&mut parsed, NameValueExpression::parse(expr.as_ref(), true));
        }
        Self { expressions: parsed }
    }

    #[must_use]
    pub fn expressions(&self) -> &[NameValueExpression] {
        &self.expressions
    }

    fn value_match_count(&self) -> usize {
        self.expressions
            .iter()
            .filter(|e| e.is_positive_value())
            .count()
    }
}

impl RequestCondition for ParamsCondition {
    fn combine(&self, other: &Self) -> Result<Self, PatternError> {
        let mut expressions = self.expressions.clone();
        for expr in &other.expressions {
            push_unique(&mut expressions, expr.clone());
        }
        Ok(Self { expressions })
    }

    fn get_matching_condition(&self, request: &Request) -> Option<Self> {
        self.expressions
            .iter()
            .all(|e| e.matches(request.query_param(e.name())))
            .then(|| self.clone())
    }

    fn compare_to(&self, other: &Self, _request: &Request) -> Ordering {
        other
            .expressions
            .len()
            .cmp(&self.expressions.len())
            .then_with(|| other.value_match_count().cmp(&self.value_match_count()))
    }

    fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

impl PartialEq for ParamsCondition {
    fn eq(&self, other: &Self) -> bool {
        same_set(&self.expressions, &other.expressions)
    }
}

impl Eq for ParamsCondition {}

impl Hash for ParamsCondition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut keys: Vec<String> = self.expressions.iter().map(ToString::to_string).collect();
        keys.sort_unstable();
        keys.hash(state);
    }
}

impl fmt::Display for ParamsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.expressions, " && ")
    }
}
