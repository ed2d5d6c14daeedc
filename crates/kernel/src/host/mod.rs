//! Host collaborators.
//!
//! The widget never talks to a CMS directly. Content-type lookup, taxonomy
//! metadata, primary-term lookup and query execution are provided by the host
//! through these traits and injected when the widget is constructed.

mod site_index;

use anyhow::Result;
use uuid::Uuid;

use crate::gather::ContentQuery;
use crate::models::ContentItem;

pub use site_index::{SiteFixture, SiteIndex};

/// Content type registry.
pub trait ContentTypes: Send + Sync {
    /// Whether a content type with this machine name is registered.
    fn type_exists(&self, name: &str) -> bool;
}

/// Taxonomy metadata.
pub trait TaxonomyRegistry: Send + Sync {
    /// Whether a taxonomy with this machine name is registered.
    fn taxonomy_exists(&self, name: &str) -> bool;

    /// Whether the taxonomy is attached to the content type.
    fn is_attached_to_type(&self, taxonomy: &str, content_type: &str) -> bool;

    /// Taxonomies attached to a content type, in registration order.
    fn taxonomies_for_type(&self, content_type: &str) -> Vec<String>;

    /// Whether the taxonomy exists and is attached to the content type.
    fn applies(&self, taxonomy: &str, content_type: &str) -> bool {
        self.taxonomy_exists(taxonomy) && self.is_attached_to_type(taxonomy, content_type)
    }
}

/// Primary-term lookup.
pub trait PrimaryTermSource: Send + Sync {
    /// The item's primary term slug in a taxonomy, or else all of its
    /// assigned slugs joined by commas. Empty when the item has none.
    fn primary_or_all_slugs(&self, item_id: Uuid, taxonomy: &str) -> String;
}

/// Content store executing query descriptions.
pub trait ContentStore: Send + Sync {
    /// Run a query, returning matching items in order.
    fn query(&self, query: &ContentQuery) -> Result<Vec<ContentItem>>;
}
