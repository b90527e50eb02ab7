use http::Method;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::expression::same_set;
use super::RequestCondition;
use crate::error::PatternError;
use crate::request::Request;

/// HTTP methods a registration accepts. Empty accepts every method.
#[derive(Debug, Clone, Default)]
pub struct RequestMethodsCondition {
    methods: Vec<Method>,
}

impl RequestMethodsCondition {
    #[must_use]
    pub fn new<I: IntoIterator<Item = Method>>(methods: I) -> Self {
        let mut unique = Vec::new();
        for method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }
        Self { methods: unique }
    }

    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    fn single(method: Method) -> Self {
        Self {
            methods: vec![method],
        }
    }
}

impl RequestCondition for RequestMethodsCondition {
    fn combine(&self, other: &Self) -> Result<Self, PatternError> {
        Ok(Self::new(
            self.methods.iter().chain(other.methods.iter()).cloned(),
        ))
    }

    /// An explicit method list narrows to the request method. `HEAD` is
    /// served by a `GET` registration, reported as `GET`.
    fn get_matching_condition(&self, request: &Request) -> Option<Self> {
        if self.methods.is_empty() {
            return Some(self.clone());
        }
        let method = request.method();
        if self.methods.contains(method) {
            return Some(Self::single(method.clone()));
        }
        if *method == Method::HEAD && self.methods.contains(&Method::GET) {
            return Some(Self::single(Method::GET));
        }
        None
    }

    fn compare_to(&self, other: &Self, _request: &Request) -> Ordering {
        if self.methods.len() != other.methods.len() {
            // After matching a list holds at most one method: naming it
            // beats accepting anything.
            return other.methods.len().cmp(&self.methods.len());
        }
        if self.methods.len() == 1 {
            if self.methods[0] == Method::HEAD && other.methods[0] == Method::GET {
                return Ordering::Less;
            }
            if self.methods[0] == Method::GET && other.methods[0] == Method::HEAD {
                return Ordering::Greater;
            }
        }
        Ordering::Equal
    }

    fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl PartialEq for RequestMethodsCondition {
    fn eq(&self, other: &Self) -> bool {
        same_set(&self.methods, &other.methods)
    }
}

impl Eq for RequestMethodsCondition {}

impl Hash for RequestMethodsCondition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut names: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
        names.sort_unstable();
        names.hash(state);
    }
}

impl fmt::Display for RequestMethodsCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.methods.as_slice() {
            [single] => write!(f, "{}", single),
            methods => super::expression::write_joined(f, methods, ", "),
        }
    }
}
