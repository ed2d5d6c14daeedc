//! Taxonomy filter construction.
//!
//! Converts category/location CSVs into a [`FilterSet`] and assembles the
//! [`ContentQuery`] handed to the content store.
//!
//! CSV syntax: comma-separated term names or slugs; a leading `-` marks an
//! exclusion (`"premises-liability,-medical-malpractice"`).

use tracing::debug;
use uuid::Uuid;

use crate::host::TaxonomyRegistry;
use crate::models::ItemStatus;
use crate::params::DisplayConfig;
use crate::services::{sanitize_key, slugify};

use super::types::{ContentQuery, FilterSet, Relation, TermFilter, TermOperator};

/// Taxonomy name for category filters.
pub const CATEGORY_TAXONOMY: &str = "category";

/// Include and exclude slugs parsed from a CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTerms {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl ParsedTerms {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Split a term CSV into include and exclude slugs.
///
/// Tokens are trimmed and slugified; tokens that normalize to nothing are
/// dropped. Each list is deduplicated, keeping first-seen order.
pub fn parse_terms_csv(csv: &str) -> ParsedTerms {
    let mut parsed = ParsedTerms::default();

    for token in csv.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (is_exclude, term) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        let slug = slugify(term);
        if slug.is_empty() {
            continue;
        }

        let target = if is_exclude {
            &mut parsed.exclude
        } else {
            &mut parsed.include
        };
        if !target.contains(&slug) {
            target.push(slug);
        }
    }

    parsed
}

/// Builds term filters for one content type.
pub struct FilterQueryBuilder<'a> {
    taxonomies: &'a dyn TaxonomyRegistry,
    content_type: &'a str,
}

impl<'a> FilterQueryBuilder<'a> {
    pub fn new(taxonomies: &'a dyn TaxonomyRegistry, content_type: &'a str) -> Self {
        Self {
            taxonomies,
            content_type,
        }
    }

    /// Pick the taxonomy used for location filters.
    ///
    /// Preference order: a valid override attached to the content type, an
    /// attached taxonomy named exactly `location` or `locations`, then the
    /// first attached taxonomy whose name contains `location`.
    pub fn resolve_location_taxonomy(&self, override_name: Option<&str>) -> Option<String> {
        if let Some(name) = override_name.map(sanitize_key).filter(|n| !n.is_empty()) {
            if self.taxonomies.applies(&name, self.content_type) {
                return Some(name);
            }
            debug!(
                taxonomy = %name,
                content_type = %self.content_type,
                "location taxonomy override does not apply, auto-detecting"
            );
        }

        let attached = self.taxonomies.taxonomies_for_type(self.content_type);
        attached
            .iter()
            .find(|t| t.as_str() == "location" || t.as_str() == "locations")
            .or_else(|| attached.iter().find(|t| t.contains("location")))
            .cloned()
    }

    /// Build the filter set for category and location CSVs.
    ///
    /// Category filters never match child terms; location filters include
    /// descendants of every include term. A taxonomy is skipped when it
    /// does not apply to the content type or yields no slugs.
    pub fn build(
        &self,
        category_csv: &str,
        location_csv: &str,
        relation: Relation,
        operator: TermOperator,
        location_taxonomy: Option<&str>,
    ) -> FilterSet {
        let mut set = FilterSet::new(relation);

        if let Some(filter) = self.term_filter(CATEGORY_TAXONOMY, category_csv, operator, false) {
            set.push(filter);
        }

        if let Some(taxonomy) = location_taxonomy
            && let Some(filter) = self.term_filter(taxonomy, location_csv, operator, true)
        {
            set.push(filter);
        }

        debug!(
            content_type = %self.content_type,
            filters = set.len(),
            relation = set.relation.as_str(),
            "built taxonomy filter set"
        );
        set
    }

    fn term_filter(
        &self,
        taxonomy: &str,
        csv: &str,
        operator: TermOperator,
        include_children: bool,
    ) -> Option<TermFilter> {
        if csv.is_empty() || !self.taxonomies.applies(taxonomy, self.content_type) {
            return None;
        }

        let parsed = parse_terms_csv(csv);
        if parsed.is_empty() {
            return None;
        }

        Some(TermFilter {
            taxonomy: taxonomy.to_string(),
            include: parsed.include,
            exclude: parsed.exclude,
            operator,
            include_children,
        })
    }
}

/// Assemble the content store query.
///
/// The current item, when known, is excluded from its own related items.
pub fn build_query(
    config: &DisplayConfig,
    filter_set: FilterSet,
    current_item: Option<Uuid>,
) -> ContentQuery {
    ContentQuery {
        content_type: config.content_type.clone(),
        status: ItemStatus::Published,
        limit: config.limit,
        exclude_ids: current_item.into_iter().collect(),
        order_field: config.order_field.clone(),
        order_direction: config.order_direction,
        filter_set,
    }
}
