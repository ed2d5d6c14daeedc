//! Kinship test utilities.
//!
//! Builders for site fixtures (items, taxonomies, content types) and
//! assertion helpers for rendered markup. Fixtures are produced as JSON so
//! they can be fed to any store that reads the site fixture format.

use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

/// Create a published test item with default values.
pub fn test_item(item_type: &str, title: &str) -> TestItem {
    TestItem {
        id: Uuid::now_v7(),
        item_type: item_type.to_string(),
        title: title.to_string(),
        slug: None,
        permalink: None,
        status: "published".to_string(),
        created: 0,
        menu_order: 0,
        thumbnail_url: None,
        fields: json!({}),
        terms: json!({}),
        primary_terms: json!({}),
    }
}

/// A test item builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestItem {
    pub id: Uuid,
    pub item_type: String,
    pub title: String,
    pub slug: Option<String>,
    pub permalink: Option<String>,
    pub status: String,
    pub created: i64,
    pub menu_order: i32,
    pub thumbnail_url: Option<String>,
    pub fields: JsonValue,
    pub terms: JsonValue,
    pub primary_terms: JsonValue,
}

impl TestItem {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn with_permalink(mut self, permalink: &str) -> Self {
        self.permalink = Some(permalink.to_string());
        self
    }

    /// Set as draft.
    pub fn unpublished(mut self) -> Self {
        self.status = "draft".to_string();
        self
    }

    /// Set as published.
    pub fn published(mut self) -> Self {
        self.status = "published".to_string();
        self
    }

    /// Set the creation time (Unix seconds).
    pub fn created_at(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    pub fn with_menu_order(mut self, menu_order: i32) -> Self {
        self.menu_order = menu_order;
        self
    }

    pub fn with_thumbnail(mut self, url: &str) -> Self {
        self.thumbnail_url = Some(url.to_string());
        self
    }

    /// Add a single field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.fields.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Add a text field.
    pub fn with_text_field(self, name: &str, value: &str, format: &str) -> Self {
        self.with_field(
            name,
            json!({
                "value": value,
                "format": format
            }),
        )
    }

    /// Assign term slugs in a taxonomy.
    pub fn with_terms(mut self, taxonomy: &str, slugs: &[&str]) -> Self {
        if let Some(obj) = self.terms.as_object_mut() {
            obj.insert(taxonomy.to_string(), json!(slugs));
        }
        self
    }

    /// Set the primary term of a taxonomy.
    pub fn with_primary_term(mut self, taxonomy: &str, slug: &str) -> Self {
        if let Some(obj) = self.primary_terms.as_object_mut() {
            obj.insert(taxonomy.to_string(), json!(slug));
        }
        self
    }

    /// Site fixture representation.
    pub fn to_json(&self) -> JsonValue {
        let mut value = json!({
            "id": self.id,
            "type": self.item_type,
            "title": self.title,
            "status": self.status,
            "created": self.created,
            "menu_order": self.menu_order,
            "fields": self.fields,
            "terms": self.terms,
            "primary_terms": self.primary_terms,
        });
        if let Some(obj) = value.as_object_mut() {
            for (key, field) in [
                ("slug", &self.slug),
                ("permalink", &self.permalink),
                ("thumbnail_url", &self.thumbnail_url),
            ] {
                if let Some(v) = field {
                    obj.insert(key.to_string(), json!(v));
                }
            }
        }
        value
    }
}

/// Create a flat taxonomy attached to the given content types.
pub fn test_taxonomy(name: &str, object_types: &[&str]) -> TestTaxonomy {
    TestTaxonomy {
        name: name.to_string(),
        hierarchical: false,
        object_types: object_types.iter().map(|s| s.to_string()).collect(),
        terms: Vec::new(),
    }
}

/// A taxonomy builder.
#[derive(Debug, Clone)]
pub struct TestTaxonomy {
    pub name: String,
    pub hierarchical: bool,
    pub object_types: Vec<String>,
    /// `(slug, parent)` pairs.
    pub terms: Vec<(String, Option<String>)>,
}

impl TestTaxonomy {
    pub fn hierarchical(mut self) -> Self {
        self.hierarchical = true;
        self
    }

    /// Add a top-level term.
    pub fn with_term(mut self, slug: &str) -> Self {
        self.terms.push((slug.to_string(), None));
        self
    }

    /// Add a child term; marks the taxonomy hierarchical.
    pub fn with_child(mut self, slug: &str, parent: &str) -> Self {
        self.hierarchical = true;
        self.terms.push((slug.to_string(), Some(parent.to_string())));
        self
    }

    pub fn to_json(&self) -> JsonValue {
        let terms: Vec<JsonValue> = self
            .terms
            .iter()
            .map(|(slug, parent)| json!({ "slug": slug, "parent": parent }))
            .collect();
        json!({
            "name": self.name,
            "label": self.name,
            "hierarchical": self.hierarchical,
            "object_types": self.object_types,
            "terms": terms,
        })
    }
}

/// Create an empty site with the `post` and `page` content types.
pub fn test_site() -> TestSite {
    TestSite {
        content_types: vec!["post".to_string(), "page".to_string()],
        taxonomies: Vec::new(),
        items: Vec::new(),
    }
}

/// A site fixture builder.
#[derive(Debug, Clone)]
pub struct TestSite {
    pub content_types: Vec<String>,
    pub taxonomies: Vec<TestTaxonomy>,
    pub items: Vec<TestItem>,
}

impl TestSite {
    pub fn with_content_type(mut self, name: &str) -> Self {
        self.content_types.push(name.to_string());
        self
    }

    pub fn with_taxonomy(mut self, taxonomy: TestTaxonomy) -> Self {
        self.taxonomies.push(taxonomy);
        self
    }

    pub fn with_item(mut self, item: TestItem) -> Self {
        self.items.push(item);
        self
    }

    /// Site fixture JSON.
    pub fn to_json(&self) -> JsonValue {
        let content_types: Vec<JsonValue> = self
            .content_types
            .iter()
            .map(|name| json!({ "name": name, "label": name }))
            .collect();
        json!({
            "content_types": content_types,
            "taxonomies": self.taxonomies.iter().map(TestTaxonomy::to_json).collect::<Vec<_>>(),
            "items": self.items.iter().map(TestItem::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Assertion helpers for JSON and markup.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual,
            expected,
            "JSON mismatch:\nactual: {}\nexpected: {}",
            serde_json::to_string_pretty(actual).unwrap_or_default(),
            serde_json::to_string_pretty(expected).unwrap_or_default()
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `needles` occur in `haystack` in the given order.
    pub fn in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(pos) => from += pos + needle.len(),
                None => panic!("Expected '{needle}' after byte {from}\nActual: {haystack}"),
            }
        }
    }
}
