//! # Condition Module
//!
//! Request conditions are the independent predicates a registration is made
//! of. Each one can be narrowed to the part that applies to a request,
//! merged with an outer scope, and ranked against another condition of the
//! same kind.
//!
//! | Condition | Matches on |
//! |---|---|
//! | [`PatternsCondition`] | lookup path against Ant-style patterns |
//! | [`RequestMethodsCondition`] | HTTP method |
//! | [`ParamsCondition`] | query parameter expressions |
//! | [`HeadersCondition`] | header expressions |
//! | [`ConsumesCondition`] | request `Content-Type` |

mod consumes;
mod expression;
mod headers;
mod methods;
mod params;
mod patterns;

use std::cmp::Ordering;

use crate::error::PatternError;
use crate::request::Request;

pub use consumes::{ConsumesCondition, MediaType, MediaTypeExpression, DEFAULT_CONTENT_TYPE};
pub use expression::NameValueExpression;
pub use headers::HeadersCondition;
pub use methods::RequestMethodsCondition;
pub use params::ParamsCondition;
pub use patterns::PatternsCondition;

/// Contract shared by every request condition.
pub trait RequestCondition: Sized {
    /// Merge an outer-scope condition (`self`) with an inner-scope one.
    fn combine(&self, other: &Self) -> Result<Self, PatternError>;

    /// The part of this condition that applies to `request`, or `None` if it
    /// does not apply at all.
    fn get_matching_condition(&self, request: &Request) -> Option<Self>;

    /// `Less` when `self` is the closer match for `request`. Both sides must
    /// come from [`RequestCondition::get_matching_condition`] for the same
    /// request.
    fn compare_to(&self, other: &Self, request: &Request) -> Ordering;

    /// `true` if the condition places no constraint on the request.
    fn is_empty(&self) -> bool;
}
