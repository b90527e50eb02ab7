//! Error taxonomy for pattern compilation, registration and routing.
//!
//! Compile and registration errors are raised synchronously while the
//! registry is being built. Routing errors are per-request and carry enough
//! information for the serving layer to pick a response status.

use http::{Method, StatusCode};
use std::fmt;

/// Errors raised while compiling, combining or validating patterns and
/// other condition expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern uses unbalanced or unsupported syntax.
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Human readable reason
        reason: String,
    },
    /// Two patterns carry different concrete file extensions and cannot be
    /// combined (e.g. `/*.html` and `/*.txt`).
    IncompatibleCombine {
        /// Left-hand (outer scope) pattern
        first: String,
        /// Right-hand (inner scope) pattern
        second: String,
    },
    /// A media type expression could not be parsed.
    InvalidMediaType {
        /// The offending expression
        value: String,
    },
    /// URI variables were requested for a path the pattern does not match.
    NoMatch {
        /// Pattern that was applied
        pattern: String,
        /// Path it was applied to
        path: String,
    },
}

impl PatternError {
    pub(crate) fn invalid(pattern: &str, reason: impl Into<String>) -> Self {
        PatternError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern '{}': {}", pattern, reason)
            }
            PatternError::IncompatibleCombine { first, second } => {
                write!(f, "cannot combine patterns: {} vs {}", first, second)
            }
            PatternError::InvalidMediaType { value } => {
                write!(f, "invalid media type '{}'", value)
            }
            PatternError::NoMatch { pattern, path } => {
                write!(f, "pattern '{}' does not match path '{}'", pattern, path)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Errors raised by [`crate::Router::register`] and the underlying registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The mapping key is already registered.
    DuplicateMapping {
        /// Display form of the colliding mapping
        mapping: String,
    },
    /// A pattern or condition expression failed to compile.
    Pattern(PatternError),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::DuplicateMapping { mapping } => write!(
                f,
                "ambiguous mapping: cannot register {}, there is already a handler mapped",
                mapping
            ),
            RegistrationError::Pattern(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::Pattern(err) => Some(err),
            RegistrationError::DuplicateMapping { .. } => None,
        }
    }
}

impl From<PatternError> for RegistrationError {
    fn from(err: PatternError) -> Self {
        RegistrationError::Pattern(err)
    }
}

/// Outcome of a failed routing attempt.
///
/// `NotFound` and its refinements are normal outcomes; `Ambiguous` is a
/// configuration error surfaced at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No registration applies to the request.
    NotFound {
        /// Lookup path that was routed
        path: String,
    },
    /// Some registration matched the path but none accepts the method.
    MethodNotAllowed {
        /// Request method
        method: Method,
        /// Methods declared by the registrations whose patterns matched
        allowed: Vec<Method>,
    },
    /// The path and method matched but no registration consumes the
    /// request content type.
    UnsupportedMediaType {
        /// Request content type
        content_type: String,
        /// Media types declared by the candidates
        supported: Vec<String>,
    },
    /// The path and method matched but parameter or header expressions did
    /// not hold.
    UnsatisfiedParams {
        /// Expressions declared by the candidates, one entry per candidate
        conditions: Vec<String>,
    },
    /// Two distinct registrations match equally well.
    Ambiguous {
        /// Lookup path that was routed
        path: String,
        /// Display form of the first tied mapping
        first: String,
        /// Display form of the second tied mapping
        second: String,
    },
}

impl RouteError {
    /// `true` for every variant except [`RouteError::Ambiguous`].
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        !matches!(self, RouteError::Ambiguous { .. })
    }

    /// Status code a serving layer would answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::NotFound { .. } => StatusCode::NOT_FOUND,
            RouteError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            RouteError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RouteError::UnsatisfiedParams { .. } => StatusCode::BAD_REQUEST,
            RouteError::Ambiguous { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NotFound { path } => write!(f, "no handler found for '{}'", path),
            RouteError::MethodNotAllowed { method, allowed } => {
                let allowed: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                write!(
                    f,
                    "request method '{}' not supported, allowed: [{}]",
                    method,
                    allowed.join(", ")
                )
            }
            RouteError::UnsupportedMediaType {
                content_type,
                supported,
            } => write!(
                f,
                "content type '{}' not supported, supported: [{}]",
                content_type,
                supported.join(", ")
            ),
            RouteError::UnsatisfiedParams { conditions } => write!(
                f,
                "parameter conditions not met for actual request parameters: {}",
                conditions.join(" OR ")
            ),
            RouteError::Ambiguous {
                path,
                first,
                second,
            } => write!(
                f,
                "ambiguous handler methods mapped for '{}': {{{}, {}}}",
                path, first, second
            ),
        }
    }
}

impl std::error::Error for RouteError {}

/// Errors raised while loading [`crate::config::RouterConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The configuration text is not valid TOML for this schema.
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read router configuration: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse router configuration: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}
