//! # Router Module
//!
//! The router maps a [`crate::Request`] to the handler of the single most
//! specific registration, or explains why none applies.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Holding registrations behind a read/write lock
//! - Rejecting duplicate registrations
//! - Ranking every applicable registration and detecting ties
//! - Extracting URI template variables from the winning pattern
//!
//! ## Resolution
//!
//! 1. **Direct lookup**: registrations whose literal patterns equal the
//!    lookup path are tried first.
//! 2. **Full scan**: if none of them applies, every registration is
//!    narrowed to the request.
//! 3. **Ranking**: candidates are sorted by patterns, params, headers,
//!    consumes, then methods. A tie for first place is an ambiguity error.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routematch::{ConditionSet, Request, RouteError, Router};
//!
//! let router: Router<&'static str> = Router::new();
//! router
//!     .register_patterns(["/pets/{id}"], ConditionSet::new().methods([Method::GET]), "get_pet")
//!     .unwrap();
//! router
//!     .register_patterns(["/pets/*"], ConditionSet::new(), "any_pet")
//!     .unwrap();
//!
//! let found = router.route(&Request::new(Method::GET, "/pets/42")).unwrap();
//! assert_eq!(found.handler, "get_pet");
//! assert_eq!(found.get_path_param("id"), Some("42"));
//!
//! let err = router.route(&Request::new(Method::GET, "/owners/1")).unwrap_err();
//! assert!(matches!(err, RouteError::NotFound { .. }));
//! ```

mod core;

pub use core::{AmbiguousMapping, RouteMatch, Router};
