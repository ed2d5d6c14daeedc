//! In-memory site backed by a fixture file.
//!
//! `SiteIndex` implements every host collaborator over a YAML or JSON site
//! description, which makes the widget usable from the command line and in
//! tests without a CMS behind it.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{KinshipError, KinshipResult};
use crate::gather::{ContentQuery, Relation, SortDirection, TermClause, TermFilter, TermOperator};
use crate::models::{ContentItem, ContentTypeDef, Taxonomy};

use super::{ContentStore, ContentTypes, PrimaryTermSource, TaxonomyRegistry};

fn default_content_types() -> Vec<ContentTypeDef> {
    vec![
        ContentTypeDef::new("post", "Posts"),
        ContentTypeDef::new("page", "Pages"),
    ]
}

/// Serialized site description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteFixture {
    /// Registered content types (default: post and page).
    #[serde(default = "default_content_types")]
    pub content_types: Vec<ContentTypeDef>,

    #[serde(default)]
    pub taxonomies: Vec<Taxonomy>,

    #[serde(default)]
    pub items: Vec<ContentItem>,
}

impl Default for SiteFixture {
    fn default() -> Self {
        Self {
            content_types: default_content_types(),
            taxonomies: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// Indexed, read-only site.
#[derive(Debug, Clone)]
pub struct SiteIndex {
    content_types: Vec<ContentTypeDef>,
    taxonomies: Vec<Taxonomy>,
    items: Vec<ContentItem>,
    by_id: HashMap<Uuid, usize>,
}

impl SiteIndex {
    /// Index a fixture.
    ///
    /// Fails on duplicate item ids. Term assignments in unknown taxonomies are
    /// kept but logged.
    pub fn new(fixture: SiteFixture) -> KinshipResult<Self> {
        let SiteFixture {
            content_types,
            taxonomies,
            items,
        } = fixture;

        let mut by_id = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if by_id.insert(item.id, idx).is_some() {
                return Err(KinshipError::Fixture(format!("duplicate item id {}", item.id)));
            }
            for taxonomy in item.terms.keys() {
                if !taxonomies.iter().any(|t| &t.name == taxonomy) {
                    warn!(item = %item.id, taxonomy = %taxonomy, "item uses unknown taxonomy");
                }
            }
        }

        debug!(
            content_types = content_types.len(),
            taxonomies = taxonomies.len(),
            items = items.len(),
            "indexed site fixture"
        );

        Ok(Self {
            content_types,
            taxonomies,
            items,
            by_id,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> KinshipResult<Self> {
        Self::new(serde_yml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> KinshipResult<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> KinshipResult<Self> {
        Self::new(serde_json::from_value(value)?)
    }

    /// Load a fixture file; `.json` files are parsed as JSON, anything else
    /// as YAML.
    pub fn load(path: &Path) -> KinshipResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Find an item by UUID or by slug.
    pub fn find_item(&self, key: &str) -> Option<&ContentItem> {
        if let Ok(id) = Uuid::parse_str(key) {
            return self.item(id);
        }
        self.items.iter().find(|item| item.name() == key)
    }

    pub fn item(&self, id: Uuid) -> Option<&ContentItem> {
        self.by_id.get(&id).and_then(|idx| self.items.get(*idx))
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn taxonomy(&self, name: &str) -> Option<&Taxonomy> {
        self.taxonomies.iter().find(|t| t.name == name)
    }

    /// Whether an item satisfies every clause of a term filter.
    fn matches_filter(&self, item: &ContentItem, filter: &TermFilter) -> bool {
        filter
            .clauses()
            .all(|clause| self.matches_clause(item, &clause))
    }

    fn matches_clause(&self, item: &ContentItem, clause: &TermClause<'_>) -> bool {
        let assigned = item.terms_in(clause.taxonomy);
        if clause.require_assigned && assigned.is_empty() {
            return false;
        }

        let mut slugs: HashSet<&str> = assigned.iter().map(String::as_str).collect();
        let ancestors: Vec<String> = match (clause.include_children, self.taxonomy(clause.taxonomy)) {
            (true, Some(taxonomy)) => assigned
                .iter()
                .flat_map(|slug| taxonomy.ancestors(slug))
                .collect(),
            _ => Vec::new(),
        };
        slugs.extend(ancestors.iter().map(String::as_str));

        let mut terms = clause.terms.iter().map(String::as_str);
        match clause.operator {
            TermOperator::In => terms.any(|t| slugs.contains(t)),
            TermOperator::And => terms.all(|t| slugs.contains(t)),
            TermOperator::NotIn => !terms.any(|t| slugs.contains(t)),
        }
    }

    fn matches_query(&self, item: &ContentItem, query: &ContentQuery) -> bool {
        if item.item_type != query.content_type
            || item.status != query.status
            || query.exclude_ids.contains(&item.id)
        {
            return false;
        }

        let set = &query.filter_set;
        match set.relation {
            _ if set.is_empty() => true,
            Relation::And => set.filters.iter().all(|f| self.matches_filter(item, f)),
            Relation::Or => set.filters.iter().any(|f| self.matches_filter(item, f)),
        }
    }
}

/// Compare two items by an order field; unknown fields compare by creation date.
fn compare_by(field: &str, a: &ContentItem, b: &ContentItem) -> Ordering {
    match field {
        "title" => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        "name" => a.name().cmp(&b.name()),
        "menu_order" => a.menu_order.cmp(&b.menu_order),
        "id" => a.id.cmp(&b.id),
        "modified" => a.changed.cmp(&b.changed),
        _ => a.created.cmp(&b.created),
    }
}

impl ContentTypes for SiteIndex {
    fn type_exists(&self, name: &str) -> bool {
        self.content_types.iter().any(|t| t.name == name)
    }
}

impl TaxonomyRegistry for SiteIndex {
    fn taxonomy_exists(&self, name: &str) -> bool {
        self.taxonomy(name).is_some()
    }

    fn is_attached_to_type(&self, taxonomy: &str, content_type: &str) -> bool {
        self.taxonomy(taxonomy)
            .is_some_and(|t| t.applies_to(content_type))
    }

    fn taxonomies_for_type(&self, content_type: &str) -> Vec<String> {
        self.taxonomies
            .iter()
            .filter(|t| t.applies_to(content_type))
            .map(|t| t.name.clone())
            .collect()
    }
}

impl PrimaryTermSource for SiteIndex {
    fn primary_or_all_slugs(&self, item_id: Uuid, taxonomy: &str) -> String {
        let Some(item) = self.item(item_id) else {
            return String::new();
        };
        match item.primary_terms.get(taxonomy) {
            Some(primary) if !primary.is_empty() => primary.clone(),
            _ => item.terms_in(taxonomy).join(","),
        }
    }
}

impl ContentStore for SiteIndex {
    fn query(&self, query: &ContentQuery) -> Result<Vec<ContentItem>> {
        let mut matched: Vec<&ContentItem> = self
            .items
            .iter()
            .filter(|item| self.matches_query(item, query))
            .collect();

        if query.order_field == "rand" {
            matched.shuffle(&mut rand::thread_rng());
        } else {
            matched.sort_by(|a, b| {
                let primary = compare_by(&query.order_field, a, b);
                let primary = match query.order_direction {
                    SortDirection::Asc => primary,
                    SortDirection::Desc => primary.reverse(),
                };
                primary.then_with(|| a.id.cmp(&b.id))
            });
        }

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        matched.truncate(limit);

        debug!(
            content_type = %query.content_type,
            order = %query.order_field,
            results = matched.len(),
            "site index query"
        );
        Ok(matched.into_iter().cloned().collect())
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::gather::FilterSet;
    use crate::models::ItemStatus;

    const SITE: &str = r#"
taxonomies:
  - name: category
    object_types: [post]
    terms:
      - slug: injury
      - slug: malpractice
  - name: locations
    hierarchical: true
    object_types: [post]
    terms:
      - slug: california
      - slug: los-angeles
        parent: california
      - slug: beverly-hills
        parent: los-angeles
items:
  - id: 00000000-0000-7000-8000-000000000001
    type: post
    title: Slip and Fall
    created: 2024-01-01
    terms:
      category: [injury]
      locations: [beverly-hills]
  - id: 00000000-0000-7000-8000-000000000002
    type: post
    title: Surgical Errors
    created: 2024-02-01
    terms:
      category: [malpractice, injury]
    primary_terms:
      category: malpractice
  - id: 00000000-0000-7000-8000-000000000003
    type: post
    title: draft post
    status: draft
    created: 2024-03-01
    terms:
      category: [injury]
  - id: 00000000-0000-7000-8000-000000000004
    type: post
    title: Untagged
    created: 2024-04-01
  - id: 00000000-0000-7000-8000-000000000005
    type: page
    title: About
    slug: about-us
"#;

    fn site() -> SiteIndex {
        SiteIndex::from_yaml_str(SITE).unwrap()
    }

    fn id(n: u8) -> Uuid {
        Uuid::parse_str(&format!("00000000-0000-7000-8000-00000000000{n}")).unwrap()
    }

    fn query(filters: Vec<TermFilter>, relation: Relation) -> ContentQuery {
        ContentQuery {
            content_type: "post".to_string(),
            status: ItemStatus::Published,
            limit: 10,
            exclude_ids: Vec::new(),
            order_field: "date".to_string(),
            order_direction: SortDirection::Desc,
            filter_set: FilterSet { relation, filters },
        }
    }

    fn filter(taxonomy: &str, include: &[&str], exclude: &[&str]) -> TermFilter {
        TermFilter {
            taxonomy: taxonomy.to_string(),
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            operator: TermOperator::In,
            include_children: false,
        }
    }

    fn ids(items: &[ContentItem]) -> Vec<Uuid> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn defaults_register_post_and_page() {
        let site = site();
        assert!(site.type_exists("post"));
        assert!(site.type_exists("page"));
        assert!(!site.type_exists("event"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = serde_json::json!({
            "items": [
                {"id": Uuid::nil(), "type": "post", "title": "a"},
                {"id": Uuid::nil(), "type": "post", "title": "b"}
            ]
        });
        assert!(matches!(
            SiteIndex::from_value(json),
            Err(KinshipError::Fixture(_))
        ));
    }

    #[test]
    fn find_item_by_id_or_slug() {
        let site = site();
        assert_eq!(site.find_item("about-us").unwrap().title, "About");
        assert_eq!(site.find_item("slip-and-fall").unwrap().id, id(1));
        assert_eq!(
            site.find_item(&id(2).to_string()).unwrap().title,
            "Surgical Errors"
        );
        assert!(site.find_item("missing").is_none());
    }

    #[test]
    fn unfiltered_query_orders_by_date_desc() {
        let result = site().query(&query(Vec::new(), Relation::And)).unwrap();
        // Draft and page items are never returned.
        assert_eq!(ids(&result), vec![id(4), id(2), id(1)]);
    }

    #[test]
    fn excluded_ids_and_limit() {
        let mut q = query(Vec::new(), Relation::And);
        q.exclude_ids.push(id(4));
        q.limit = 1;
        let result = site().query(&q).unwrap();
        assert_eq!(ids(&result), vec![id(2)]);
    }

    #[test]
    fn include_children_matches_descendants() {
        let mut location = filter("locations", &["california"], &[]);
        assert!(site()
            .query(&query(vec![location.clone()], Relation::And))
            .unwrap()
            .is_empty());

        location.include_children = true;
        let result = site().query(&query(vec![location], Relation::And)).unwrap();
        assert_eq!(ids(&result), vec![id(1)]);
    }

    #[test]
    fn and_operator_requires_all_terms() {
        let mut category = filter("category", &["injury", "malpractice"], &[]);
        category.operator = TermOperator::And;
        let result = site().query(&query(vec![category], Relation::And)).unwrap();
        assert_eq!(ids(&result), vec![id(2)]);
    }

    #[test]
    fn exclude_requires_assigned_terms() {
        let category = filter("category", &[], &["malpractice"]);
        let result = site().query(&query(vec![category], Relation::And)).unwrap();
        // The untagged item is dropped along with the malpractice item.
        assert_eq!(ids(&result), vec![id(1)]);
    }

    #[test]
    fn excluded_parent_drops_descendant_tagged_items() {
        let mut location = filter("locations", &[], &["california"]);
        let result = site()
            .query(&query(vec![location.clone()], Relation::And))
            .unwrap();
        assert_eq!(ids(&result), vec![id(1)]);

        location.include_children = true;
        let result = site().query(&query(vec![location], Relation::And)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn overlapping_include_and_exclude_excludes() {
        let category = filter("category", &["malpractice"], &["malpractice"]);
        let result = site().query(&query(vec![category], Relation::And)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn relation_combines_filters() {
        let category = filter("category", &["malpractice"], &[]);
        let mut location = filter("locations", &["los-angeles"], &[]);
        location.include_children = true;

        let result = site()
            .query(&query(vec![category.clone(), location.clone()], Relation::And))
            .unwrap();
        assert!(result.is_empty());

        let result = site()
            .query(&query(vec![category, location], Relation::Or))
            .unwrap();
        assert_eq!(ids(&result), vec![id(2), id(1)]);
    }

    #[test]
    fn title_order_is_case_insensitive() {
        let mut q = query(Vec::new(), Relation::And);
        q.order_field = "title".to_string();
        q.order_direction = SortDirection::Asc;
        let titles: Vec<String> = site()
            .query(&q)
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Slip and Fall", "Surgical Errors", "Untagged"]);
    }

    #[test]
    fn rand_returns_matching_items() {
        let mut q = query(Vec::new(), Relation::And);
        q.order_field = "rand".to_string();
        let mut result = ids(&site().query(&q).unwrap());
        result.sort();
        assert_eq!(result, vec![id(1), id(2), id(4)]);
    }

    #[test]
    fn primary_term_or_all_slugs() {
        let site = site();
        assert_eq!(site.primary_or_all_slugs(id(2), "category"), "malpractice");
        assert_eq!(site.primary_or_all_slugs(id(1), "category"), "injury");
        assert_eq!(site.primary_or_all_slugs(id(4), "category"), "");
        assert_eq!(site.primary_or_all_slugs(Uuid::nil(), "category"), "");
    }

    #[test]
    fn taxonomy_registry() {
        let site = site();
        assert!(site.applies("locations", "post"));
        assert!(!site.applies("locations", "page"));
        assert!(!site.applies("region", "post"));
        assert_eq!(
            site.taxonomies_for_type("post"),
            vec!["category".to_string(), "locations".to_string()]
        );
    }
}
