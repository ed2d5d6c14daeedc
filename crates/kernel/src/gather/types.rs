//! Gather query types.
//!
//! Provides the store-facing query description:
//! - TermFilter: include/exclude term sets for one taxonomy
//! - FilterSet: term filters combined by a Relation
//! - ContentQuery: everything a content store needs to fetch related items

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ItemStatus;

/// Operator applied to a term list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum TermOperator {
    /// Item has any of the terms.
    #[default]
    #[serde(rename = "IN")]
    In,
    /// Item has all of the terms.
    #[serde(rename = "AND")]
    And,
    /// Item has none of the terms.
    #[serde(rename = "NOT IN")]
    NotIn,
}

impl TermOperator {
    /// Parse a user-supplied operator, case-insensitively.
    ///
    /// Anything other than `IN`, `AND` or `NOT IN` resolves to `IN`.
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "AND" => Self::And,
            "NOT IN" => Self::NotIn,
            _ => Self::In,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::And => "AND",
            Self::NotIn => "NOT IN",
        }
    }
}

/// How term filters on different taxonomies combine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relation {
    #[default]
    And,
    Or,
}

impl Relation {
    /// Parse a user-supplied relation; only `OR` (any case) selects `Or`.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("OR") {
            Self::Or
        } else {
            Self::And
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Term filter for a single taxonomy.
///
/// `operator` and `include_children` govern the include list only. The
/// exclude list is always evaluated as NOT IN without descendants, so a slug
/// present in both lists is effectively excluded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermFilter {
    /// Taxonomy machine name.
    pub taxonomy: String,

    /// Slugs to match, first-seen order.
    #[serde(default)]
    pub include: Vec<String>,

    /// Slugs to reject, first-seen order.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Operator for the include list.
    #[serde(default)]
    pub operator: TermOperator,

    /// Whether listed terms also match their descendant terms, on both sides.
    #[serde(default)]
    pub include_children: bool,
}

/// One side of a [`TermFilter`], ready for evaluation or SQL generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermClause<'a> {
    pub taxonomy: &'a str,
    pub terms: &'a [String],
    pub operator: TermOperator,
    pub include_children: bool,
    /// The item must carry at least one term of the taxonomy.
    pub require_assigned: bool,
}

impl TermFilter {
    /// Operator used for the exclude list, regardless of `operator`.
    pub const fn exclude_operator(&self) -> TermOperator {
        TermOperator::NotIn
    }

    /// Clause for the include list, if any.
    pub fn include_clause(&self) -> Option<TermClause<'_>> {
        (!self.include.is_empty()).then_some(TermClause {
            taxonomy: &self.taxonomy,
            terms: &self.include,
            operator: self.operator,
            include_children: self.include_children,
            require_assigned: false,
        })
    }

    /// Clause for the exclude list, if any.
    ///
    /// Excluding a parent term also excludes items tagged with its children
    /// when the filter includes children.
    pub fn exclude_clause(&self) -> Option<TermClause<'_>> {
        (!self.exclude.is_empty()).then_some(TermClause {
            taxonomy: &self.taxonomy,
            terms: &self.exclude,
            operator: self.exclude_operator(),
            include_children: self.include_children,
            require_assigned: true,
        })
    }

    /// All clauses of this filter; an item must satisfy every one.
    pub fn clauses(&self) -> impl Iterator<Item = TermClause<'_>> {
        self.include_clause().into_iter().chain(self.exclude_clause())
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Ordered term filters plus the relation between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterSet {
    /// Relation between filters; a no-op with fewer than two.
    #[serde(default)]
    pub relation: Relation,

    #[serde(default)]
    pub filters: Vec<TermFilter>,
}

impl FilterSet {
    pub fn new(relation: Relation) -> Self {
        Self {
            relation,
            filters: Vec::new(),
        }
    }

    pub fn push(&mut self, filter: TermFilter) {
        self.filters.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// The relation, when it actually combines two or more filters.
    pub fn effective_relation(&self) -> Option<Relation> {
        (self.filters.len() > 1).then_some(self.relation)
    }

    /// Filter for a taxonomy, if one was emitted.
    pub fn for_taxonomy(&self, taxonomy: &str) -> Option<&TermFilter> {
        self.filters.iter().find(|f| f.taxonomy == taxonomy)
    }
}

/// Query description handed to a content store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentQuery {
    /// Content type machine name.
    pub content_type: String,

    /// Required publication status.
    #[serde(default)]
    pub status: ItemStatus,

    /// Maximum number of items (≥ 1).
    pub limit: u32,

    /// Items never returned (the current item).
    #[serde(default)]
    pub exclude_ids: Vec<Uuid>,

    /// Field to order by (e.g., "date", "title", "menu_order", "rand").
    pub order_field: String,

    #[serde(default)]
    pub order_direction: SortDirection,

    /// Taxonomy filters; omitted when empty.
    #[serde(default, skip_serializing_if = "FilterSet::is_empty")]
    pub filter_set: FilterSet,
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn operator_parsing_is_total() {
        assert_eq!(TermOperator::parse("in"), TermOperator::In);
        assert_eq!(TermOperator::parse("and"), TermOperator::And);
        assert_eq!(TermOperator::parse("not in"), TermOperator::NotIn);
        assert_eq!(TermOperator::parse("NOT IN"), TermOperator::NotIn);
        assert_eq!(TermOperator::parse("EXISTS"), TermOperator::In);
        assert_eq!(TermOperator::parse(""), TermOperator::In);
    }

    #[test]
    fn relation_parsing_is_total() {
        assert_eq!(Relation::parse("or"), Relation::Or);
        assert_eq!(Relation::parse("OR"), Relation::Or);
        assert_eq!(Relation::parse("and"), Relation::And);
        assert_eq!(Relation::parse("xor"), Relation::And);
    }

    #[test]
    fn operator_serialization() {
        let json = serde_json::to_string(&TermOperator::NotIn).unwrap();
        assert_eq!(json, "\"NOT IN\"");
        let parsed: TermOperator = serde_json::from_str("\"AND\"").unwrap();
        assert_eq!(parsed, TermOperator::And);
    }

    #[test]
    fn exclude_clause_is_always_not_in() {
        for operator in [TermOperator::In, TermOperator::And, TermOperator::NotIn] {
            let filter = TermFilter {
                taxonomy: "category".to_string(),
                include: vec!["a".to_string()],
                exclude: vec!["b".to_string()],
                operator,
                include_children: true,
            };
            let exclude = filter.exclude_clause().unwrap();
            assert_eq!(exclude.operator, TermOperator::NotIn);
            assert!(exclude.include_children);
            assert!(exclude.require_assigned);

            let include = filter.include_clause().unwrap();
            assert_eq!(include.operator, operator);
            assert!(include.include_children);
            assert_eq!(filter.clauses().count(), 2);
        }
    }

    #[test]
    fn exclude_clause_follows_include_children() {
        let filter = TermFilter {
            taxonomy: "category".to_string(),
            include: Vec::new(),
            exclude: vec!["b".to_string()],
            operator: TermOperator::In,
            include_children: false,
        };
        assert!(!filter.exclude_clause().unwrap().include_children);
        assert!(filter.include_clause().is_none());
    }

    #[test]
    fn effective_relation_needs_two_filters() {
        let mut set = FilterSet::new(Relation::Or);
        assert_eq!(set.effective_relation(), None);
        set.push(TermFilter {
            taxonomy: "category".to_string(),
            include: vec!["a".to_string()],
            exclude: vec![],
            operator: TermOperator::In,
            include_children: false,
        });
        assert_eq!(set.effective_relation(), None);
        set.push(TermFilter {
            taxonomy: "locations".to_string(),
            include: vec!["b".to_string()],
            exclude: vec![],
            operator: TermOperator::In,
            include_children: true,
        });
        assert_eq!(set.effective_relation(), Some(Relation::Or));
    }

    #[test]
    fn content_query_omits_empty_filter_set() {
        let query = ContentQuery {
            content_type: "post".to_string(),
            status: ItemStatus::Published,
            limit: 5,
            exclude_ids: vec![Uuid::nil()],
            order_field: "date".to_string(),
            order_direction: SortDirection::Desc,
            filter_set: FilterSet::default(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("filter_set").is_none());
        assert_eq!(json["order_direction"], "DESC");
        assert_eq!(json["status"], "published");

        let parsed: ContentQuery = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, query);
    }
}
