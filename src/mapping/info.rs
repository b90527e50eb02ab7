use http::{HeaderValue, Method};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::condition::{
    ConsumesCondition, HeadersCondition, NameValueExpression, ParamsCondition, PatternsCondition,
    RequestCondition, RequestMethodsCondition,
};
use crate::error::PatternError;
use crate::pattern::PathMatcher;
use crate::request::Request;

/// Every condition of one registration. Used as the registry key.
///
/// Two infos are equal when all their conditions are equal; the optional
/// name is informational only.
#[derive(Debug, Clone)]
pub struct MappingInfo {
    name: Option<String>,
    patterns: PatternsCondition,
    methods: RequestMethodsCondition,
    params: ParamsCondition,
    headers: HeadersCondition,
    consumes: ConsumesCondition,
}

/// Non-pattern conditions of a registration, in raw form.
///
/// ```rust
/// use http::Method;
/// use routematch::ConditionSet;
///
/// let conditions = ConditionSet::new()
///     .methods([Method::POST])
///     .params(["dry_run!=true"])
///     .consumes(["application/json"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConditionSet {
    name: Option<String>,
    methods: Vec<Method>,
    params: Vec<String>,
    headers: Vec<String>,
    consumes: Vec<String>,
}

impl ConditionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.methods.extend(methods);
        self
    }

    #[must_use]
    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn consumes<I, S>(mut self, consumes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes.extend(consumes.into_iter().map(Into::into));
        self
    }

    /// Compile into a [`MappingInfo`] for the given patterns.
    ///
    /// `Content-Type=...` header expressions become consumes expressions.
    pub fn build<I, S>(self, patterns: I, matcher: &Arc<PathMatcher>) -> Result<MappingInfo, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(MappingInfo {
            name: self.name,
            patterns: PatternsCondition::new(patterns, Arc::clone(matcher))?,
            methods: RequestMethodsCondition::new(self.methods),
            params: ParamsCondition::new(&self.params),
            headers: HeadersCondition::new(&self.headers),
            consumes: ConsumesCondition::new(consumes_with_headers(&self.headers, &self.consumes))?,
        })
    }
}

/// Media types declared through `Content-Type` header expressions, followed
/// by the explicit consumes expressions.
fn consumes_with_headers(headers: &[String], consumes: &[String]) -> Vec<String> {
    let mut expressions = Vec::new();
    for header in headers {
        let expr = NameValueExpression::parse(header, false);
        if expr.name() != "content-type" {
            continue;
        }
        let Some(value) = expr.value() else {
            continue;
        };
        for media_type in value.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            if expr.is_negated() {
                expressions.push(format!("!{}", media_type));
            } else {
                expressions.push(media_type.to_string());
            }
        }
    }
    expressions.extend(consumes.iter().cloned());
    expressions
}

impl MappingInfo {
    /// Assemble from already built conditions.
    #[must_use]
    pub fn new(
        name: Option<String>,
        patterns: PatternsCondition,
        methods: RequestMethodsCondition,
        params: ParamsCondition,
        headers: HeadersCondition,
        consumes: ConsumesCondition,
    ) -> Self {
        Self {
            name,
            patterns,
            methods,
            params,
            headers,
            consumes,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn patterns(&self) -> &PatternsCondition {
        &self.patterns
    }

    #[must_use]
    pub fn methods(&self) -> &RequestMethodsCondition {
        &self.methods
    }

    #[must_use]
    pub fn params(&self) -> &ParamsCondition {
        &self.params
    }

    #[must_use]
    pub fn headers(&self) -> &HeadersCondition {
        &self.headers
    }

    #[must_use]
    pub fn consumes(&self) -> &ConsumesCondition {
        &self.consumes
    }

    /// Merge an outer scope (`self`, e.g. a controller prefix) with an inner
    /// one. Names join with `#`.
    pub fn combine(&self, other: &MappingInfo) -> Result<MappingInfo, PatternError> {
        let name = match (&self.name, &other.name) {
            (Some(a), Some(b)) => Some(format!("{}#{}", a, b)),
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        Ok(MappingInfo {
            name,
            patterns: self.patterns.combine(&other.patterns)?,
            methods: self.methods.combine(&other.methods)?,
            params: self.params.combine(&other.params)?,
            headers: self.headers.combine(&other.headers)?,
            consumes: self.consumes.combine(&other.consumes)?,
        })
    }

    /// This info narrowed to `request`, or `None` if any condition fails.
    ///
    /// Patterns are checked last since they are the most expensive.
    #[must_use]
    pub fn get_matching_condition(&self, request: &Request) -> Option<MappingInfo> {
        let methods = self.methods.get_matching_condition(request)?;
        let params = self.params.get_matching_condition(request)?;
        let headers = self.headers.get_matching_condition(request)?;
        let consumes = self.consumes.get_matching_condition(request)?;
        let patterns = self.patterns.get_matching_condition(request)?;
        Some(MappingInfo {
            name: self.name.clone(),
            patterns,
            methods,
            params,
            headers,
            consumes,
        })
    }

    /// Compare two infos already narrowed to `request`: patterns, then
    /// params, headers, consumes and methods. A `HEAD` request compares
    /// methods first so an explicit `HEAD` mapping wins over `GET`.
    #[must_use]
    pub fn compare_to(&self, other: &MappingInfo, request: &Request) -> Ordering {
        if request.method() == Method::HEAD {
            let result = self.methods.compare_to(&other.methods, request);
            if result != Ordering::Equal {
                return result;
            }
        }
        self.patterns
            .compare_to(&other.patterns, request)
            .then_with(|| self.params.compare_to(&other.params, request))
            .then_with(|| self.headers.compare_to(&other.headers, request))
            .then_with(|| self.consumes.compare_to(&other.consumes, request))
            .then_with(|| self.methods.compare_to(&other.methods, request))
    }

    /// Requests this info would accept for each of its literal paths: one
    /// per declared method (`GET` when none), carrying the positive param
    /// and header expressions and the first concrete consumable type.
    pub(crate) fn representative_requests(&self) -> Vec<Request> {
        let methods: Vec<Method> = if self.methods.is_empty() {
            vec![Method::GET]
        } else {
            self.methods.methods().to_vec()
        };
        let content_type = self
            .consumes
            .expressions()
            .iter()
            .find(|e| {
                !e.is_negated()
                    && !e.media_type().is_wildcard_type()
                    && !e.media_type().is_wildcard_subtype()
            })
            .and_then(|e| HeaderValue::from_str(&e.media_type().to_string()).ok());

        let mut requests = Vec::new();
        for path in self.patterns.direct_paths() {
            for method in &methods {
                let mut request = Request::new(method.clone(), path);
                for expr in self.params.expressions().iter().filter(|e| !e.is_negated()) {
                    request = request.with_query_param(expr.name(), expr.value().unwrap_or(""));
                }
                for expr in self.headers.expressions().iter().filter(|e| !e.is_negated()) {
                    let Ok(name) = http::HeaderName::from_bytes(expr.name().as_bytes()) else {
                        continue;
                    };
                    let Ok(value) = HeaderValue::from_str(expr.value().unwrap_or("1")) else {
                        continue;
                    };
                    request = request.with_header(name, value);
                }
                if let Some(ct) = &content_type {
                    request = request.with_header(http::header::CONTENT_TYPE, ct.clone());
                }
                requests.push(request);
            }
        }
        requests
    }
}

impl PartialEq for MappingInfo {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
            && self.methods == other.methods
            && self.params == other.params
            && self.headers == other.headers
            && self.consumes == other.consumes
    }
}

impl Eq for MappingInfo {}

impl Hash for MappingInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.patterns.hash(state);
        self.methods.hash(state);
        self.params.hash(state);
        self.headers.hash(state);
        self.consumes.hash(state);
    }
}

/// `{GET [/pets/{id}], params [verbose]}`
impl fmt::Display for MappingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if !self.methods.is_empty() {
            write!(f, "{} ", self.methods)?;
        }
        write!(f, "{}", self.patterns)?;
        if !self.params.is_empty() {
            write!(f, ", params {}", self.params)?;
        }
        if !self.headers.is_empty() {
            write!(f, ", headers {}", self.headers)?;
        }
        if !self.consumes.is_empty() {
            write!(f, ", consumes {}", self.consumes)?;
        }
        f.write_str("}")
    }
}
