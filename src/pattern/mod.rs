//! # Pattern Module
//!
//! Ant-style path patterns: compilation, matching, URI variable extraction,
//! combination of nested scopes and specificity ordering.
//!
//! ## Syntax
//!
//! ```text
//!  ?            one character
//!  *            zero or more characters within a path segment
//!  **           zero or more path segments
//!  {name}       a URI variable, captured
//!  {name:regex} a URI variable constrained by a regex
//! ```
//!
//! ## Example
//!
//! ```rust
//! use routematch::pattern::PathMatcher;
//!
//! let matcher = PathMatcher::default();
//! assert!(matcher.matches("/hotels/{hotel}/**", "/hotels/42/rooms/7"));
//!
//! let vars = matcher
//!     .extract_uri_template_variables("/hotels/{hotel}", "/hotels/42")
//!     .unwrap();
//! assert_eq!(vars[0].1, "42");
//!
//! assert_eq!(matcher.combine("/hotels/*", "/bookings").unwrap(), "/hotels/bookings");
//! ```

mod comparator;
mod compiled;
mod matcher;
#[cfg(test)]
mod tests;

use smallvec::SmallVec;
use std::sync::Arc;

pub use comparator::{PatternInfo, SpecificityComparator, SpecificityKey};
pub use compiled::CompiledPattern;
pub use matcher::PathMatcher;

/// Path separator used by every pattern.
pub const PATH_SEPARATOR: char = '/';

/// Maximum number of URI variables before heap allocation.
/// Most REST APIs have ≤4 path variables (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured URI variables, in declaration order.
///
/// Names are `Arc<str>` shared with the compiled pattern; values are
/// per-request data from the path.
pub type UriVariables = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;
