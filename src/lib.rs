//! # routematch
//!
//! **routematch** maps an HTTP request (method, path, headers, query
//! parameters, content type) to the single most specific registered handler
//! among a set of Ant-style pattern registrations, and reports a tie between
//! equally specific registrations as an error instead of picking one.
//!
//! ## Overview
//!
//! The crate is a routing library; it runs no server and reads no route
//! files. A serving layer builds a [`Request`] per incoming request, calls
//! [`Router::route`] and dispatches to the returned handler.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Ant-style pattern compiler/matcher, URI variable
//!   extraction, pattern combination and the specificity comparator
//! - **[`condition`]** - Request conditions: patterns, methods, params,
//!   headers, consumes
//! - **[`mapping`]** - The compound registration key and the registry
//! - **[`router`]** - Thread-safe routing, ambiguity detection and the
//!   no-match refinement (404/405/415/400)
//! - **[`config`]** - Matching flags from defaults, environment or TOML
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`error`]** - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use routematch::{ConditionSet, Request, RouteError, Router};
//!
//! let router: Router<&'static str> = Router::new();
//! router.register_patterns(["/fo*"], ConditionSet::new(), "long").unwrap();
//! router.register_patterns(["/f*"], ConditionSet::new(), "short").unwrap();
//!
//! // Longer literal prefix wins
//! let found = router.route(&Request::new(Method::GET, "/foo")).unwrap();
//! assert_eq!(found.handler, "long");
//!
//! // Two patterns that rank the same are reported, not guessed
//! router.register_patterns(["/ba?"], ConditionSet::new(), "a").unwrap();
//! router.register_patterns(["/b?r"], ConditionSet::new(), "b").unwrap();
//! let err = router.route(&Request::new(Method::GET, "/bar")).unwrap_err();
//! assert!(matches!(err, RouteError::Ambiguous { .. }));
//! ```
//!
//! ## Pattern Syntax
//!
//! | Syntax | Matches |
//! |---|---|
//! | `?` | one character |
//! | `*` | zero or more characters within a segment |
//! | `**` | zero or more segments |
//! | `{name}` | a segment part, captured as `name` |
//! | `{name:regex}` | a segment part matching `regex`, captured as `name` |

pub mod condition;
pub mod config;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod pattern;
pub mod request;
pub mod router;

pub use condition::RequestCondition;
pub use config::RouterConfig;
pub use error::{ConfigError, PatternError, RegistrationError, RouteError};
pub use mapping::{ConditionSet, MappingInfo, MappingRegistry};
pub use pattern::{PathMatcher, UriVariables};
pub use request::Request;
pub use router::{AmbiguousMapping, RouteMatch, Router};
