//! Display parameter handling.
//!
//! This module provides:
//! - RawAttributes: loosely typed attribute map and shortcode parsing
//! - ParameterResolver: validation into a typed DisplayConfig
//! - Types: DisplayConfig, DisplayMode, Columns, ResolvedParams

mod attributes;
mod resolver;
pub mod types;

pub use attributes::{KNOWN_ATTRIBUTES, RawAttributes};
pub use resolver::{
    DEFAULT_CONTENT_TYPE, DEFAULT_LIMIT, DEFAULT_ORDER_FIELD, ParameterResolver, resolve_columns,
    resolve_limit, resolve_order,
};
pub use types::{Columns, DisplayConfig, DisplayMode, ResolvedParams};
