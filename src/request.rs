//! # Request Module
//!
//! The request view every condition matches against: method, decoded path,
//! optional context path, headers and query parameters. It is independent of
//! any server; the serving layer builds one per incoming request.
//!
//! ```rust
//! use http::{HeaderValue, Method, Uri};
//! use routematch::Request;
//!
//! let uri: Uri = "/app/pets/1?format=json&tag=a&tag=b".parse().unwrap();
//! let request = Request::from_uri(Method::GET, &uri)
//!     .with_context_path("/app")
//!     .with_header("accept", HeaderValue::from_static("application/json"));
//!
//! assert_eq!(request.lookup_path(), "/pets/1");
//! assert_eq!(request.query_param("format"), Some("json"));
//! assert_eq!(request.query_params("tag").count(), 2);
//! ```

use http::header::{IntoHeaderName, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, Uri};
use url::form_urlencoded;

/// An incoming request as seen by the router.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    context_path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
}

impl Request {
    /// Request for `path`, which must already be percent-decoded.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            context_path: String::new(),
            headers: HeaderMap::new(),
            query: Vec::new(),
        }
    }

    /// Request built from a URI: the path is taken as is and the query string
    /// is decoded as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn from_uri(method: Method, uri: &Uri) -> Self {
        let mut request = Self::new(method, uri.path());
        if let Some(query) = uri.query() {
            request.query = form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
        }
        request
    }

    /// Prefix to strip from the path before matching (e.g. `/app`).
    #[must_use]
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        let mut context_path = context_path.into();
        while context_path.ends_with('/') {
            context_path.pop();
        }
        self.context_path = context_path;
        self
    }

    /// Append a header value.
    #[must_use]
    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace all headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Path used for matching: the path with the context path stripped.
    ///
    /// A path equal to the context path looks up `/`. A path outside the
    /// context path is used unchanged.
    #[must_use]
    pub fn lookup_path(&self) -> &str {
        if self.context_path.is_empty() {
            return &self.path;
        }
        match self.path.strip_prefix(self.context_path.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => &self.path,
        }
    }

    /// First value of a header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a query parameter, in request order.
    pub fn query_params<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + 'n
    where
        'a: 'n,
    {
        self.query
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_query_param(&self, name: &str) -> bool {
        self.query.iter().any(|(k, _)| k == name)
    }
}
