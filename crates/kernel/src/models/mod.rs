//! Content and taxonomy models.

pub mod item;
pub mod taxonomy;
mod timestamp;

pub use item::{ContentItem, ItemStatus};
pub use taxonomy::{ContentTypeDef, Taxonomy, Term};
