//! Shared helpers used across the resolver, filter builder and stores.

pub mod slug;

pub use slug::{sanitize_key, slugify};
