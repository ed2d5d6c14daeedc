//! Content item model.
//!
//! Items are the records a content store returns. Taxonomy assignments are
//! kept by slug, keyed by taxonomy name.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::slugify;

/// Publication status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Published,
    Draft,
    Private,
}

/// A content record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier.
    pub id: Uuid,

    /// Content type machine name.
    #[serde(rename = "type")]
    pub item_type: String,

    /// Item title.
    pub title: String,

    /// URL slug; derived from the title when absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// Public URL; `/item/{id}` when absent.
    #[serde(default)]
    pub permalink: Option<String>,

    /// Publication status (default: published).
    #[serde(default)]
    pub status: ItemStatus,

    /// Unix timestamp when created.
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub created: i64,

    /// Unix timestamp when last changed.
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub changed: i64,

    /// Manual sort weight.
    #[serde(default)]
    pub menu_order: i32,

    /// Featured image URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// Custom fields.
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,

    /// Assigned term slugs per taxonomy.
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<String>>,

    /// Designated primary term slug per taxonomy.
    #[serde(default)]
    pub primary_terms: BTreeMap<String, String>,
}

impl ContentItem {
    /// Public URL of the item.
    pub fn link(&self) -> String {
        match self.permalink.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => format!("/item/{}", self.id),
        }
    }

    /// URL slug, falling back to the slugified title.
    pub fn name(&self) -> String {
        match self.slug.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slugify(&self.title),
        }
    }

    /// Term slugs assigned in a taxonomy.
    pub fn terms_in(&self, taxonomy: &str) -> &[String] {
        self.terms.get(taxonomy).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty text value of a custom field.
    ///
    /// Accepts plain strings and `{ "value": ..., "format": ... }` text values.
    pub fn get_text(&self, name: &str) -> Option<String> {
        let text = match self.fields.get(name)? {
            serde_json::Value::String(s) => s.as_str(),
            serde_json::Value::Object(obj) => obj.get("value")?.as_str()?,
            _ => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Whether the item is publicly visible.
    pub fn is_published(&self) -> bool {
        self.status == ItemStatus::Published
    }
}
