//! Taxonomy and content type models.
//!
//! A taxonomy is a named classification dimension attached to one or more
//! content types. Hierarchical taxonomies record a parent per term; walking
//! those links lets a filter on a parent term match items tagged with a child.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A registered content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentTypeDef {
    /// Machine name (e.g., "post", "page").
    pub name: String,

    /// Human-readable label.
    #[serde(default)]
    pub label: String,
}

impl ContentTypeDef {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// A term within a taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    /// URL-safe identifier.
    pub slug: String,

    /// Display label.
    #[serde(default)]
    pub label: Option<String>,

    /// Parent term slug (hierarchical taxonomies only).
    #[serde(default)]
    pub parent: Option<String>,
}

/// A taxonomy (classification dimension).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Machine name (e.g., "category", "locations").
    pub name: String,

    /// Human-readable label.
    #[serde(default)]
    pub label: String,

    /// Whether terms may have parents.
    #[serde(default)]
    pub hierarchical: bool,

    /// Content types this taxonomy is attached to.
    #[serde(default)]
    pub object_types: Vec<String>,

    /// Terms in this taxonomy.
    #[serde(default)]
    pub terms: Vec<Term>,
}

impl Taxonomy {
    /// Whether the taxonomy is attached to a content type.
    pub fn applies_to(&self, content_type: &str) -> bool {
        self.object_types.iter().any(|t| t == content_type)
    }

    /// Find a term by slug.
    pub fn term(&self, slug: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.slug == slug)
    }

    /// Ancestor slugs of a term, nearest first.
    ///
    /// Flat taxonomies have no ancestors. Parent cycles are cut at the first
    /// repeated slug.
    pub fn ancestors(&self, slug: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        if !self.hierarchical {
            return ancestors;
        }

        let mut seen: HashSet<&str> = HashSet::from([slug]);
        let mut current = self.term(slug);
        while let Some(parent) = current.and_then(|t| t.parent.as_deref()) {
            if !seen.insert(parent) {
                break;
            }
            ancestors.push(parent.to_string());
            current = self.term(parent);
        }
        ancestors
    }

    /// Descendant slugs of a term, breadth first.
    pub fn descendants(&self, slug: &str) -> Vec<String> {
        let mut found = Vec::new();
        if !self.hierarchical {
            return found;
        }

        let mut seen: HashSet<&str> = HashSet::from([slug]);
        let mut frontier = vec![slug];
        while let Some(current) = frontier.pop() {
            for child in self
                .terms
                .iter()
                .filter(|t| t.parent.as_deref() == Some(current))
            {
                if seen.insert(child.slug.as_str()) {
                    found.push(child.slug.clone());
                    frontier.insert(0, child.slug.as_str());
                }
            }
        }
        found
    }
}
