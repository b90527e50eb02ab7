//! # Mapping Module
//!
//! A registration is keyed by a [`MappingInfo`]: the pattern set together
//! with the method, parameter, header and media type conditions. The
//! [`MappingRegistry`] owns every `MappingInfo → handler` entry plus an index
//! of literal paths so most requests skip the full scan.

mod info;
mod registry;

pub use info::{ConditionSet, MappingInfo};
pub use registry::{MappingRegistry, Registration};
