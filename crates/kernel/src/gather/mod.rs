//! Related-content query construction.
//!
//! This module provides:
//! - FilterQueryBuilder: term CSVs → FilterSet, location taxonomy detection
//! - ContentQueryBuilder: SeaQuery-based SQL generation
//! - Types: ContentQuery, FilterSet, TermFilter, TermOperator, Relation

mod filter_builder;
mod query_builder;
pub mod types;

pub use filter_builder::{
    CATEGORY_TAXONOMY, FilterQueryBuilder, ParsedTerms, build_query, parse_terms_csv,
};
pub use query_builder::{ContentQueryBuilder, status_code};
pub use types::{
    ContentQuery, FilterSet, Relation, SortDirection, TermClause, TermFilter, TermOperator,
};
