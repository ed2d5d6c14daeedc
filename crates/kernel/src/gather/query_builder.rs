//! Content query builder using SeaQuery.
//!
//! Renders a [`ContentQuery`] as PostgreSQL for stores backed by a relational
//! schema:
//! - `item(id, type, title, slug, status, created, changed, menu_order, ...)`
//! - `item_term(item_id, taxonomy, term_slug)`
//! - `term_hierarchy(taxonomy, slug, parent_slug)`
//!
//! Term clauses become correlated `EXISTS` subqueries against `item_term`.
//! Descendant matching walks `term_hierarchy` with a recursive CTE.

use sea_query::{
    Alias, Asterisk, Cond, Expr, Order, PostgresQueryBuilder, Query, SelectStatement, SimpleExpr,
};

use crate::models::ItemStatus;

use super::types::{ContentQuery, Relation, SortDirection, TermClause, TermFilter, TermOperator};

const ITEM: &str = "item";
const ITEM_TERM: &str = "item_term";

/// Query builder for related-content queries.
pub struct ContentQueryBuilder<'a> {
    query: &'a ContentQuery,
}

impl<'a> ContentQueryBuilder<'a> {
    pub fn new(query: &'a ContentQuery) -> Self {
        Self { query }
    }

    /// Build the SELECT statement.
    pub fn build(&self) -> String {
        self.statement().to_string(PostgresQueryBuilder)
    }

    /// The SELECT statement before serialization.
    pub fn statement(&self) -> SelectStatement {
        let mut select = Query::select();
        select
            .column((Alias::new(ITEM), Asterisk))
            .from(Alias::new(ITEM));

        select.and_where(item_col("type").eq(self.query.content_type.as_str()));
        select.and_where(item_col("status").eq(status_code(self.query.status)));

        if !self.query.exclude_ids.is_empty() {
            select.and_where(item_col("id").is_not_in(self.query.exclude_ids.iter().copied()));
        }

        if let Some(cond) = self.filter_condition() {
            select.cond_where(cond);
        }

        self.add_sorts(&mut select);
        select.limit(u64::from(self.query.limit));
        select
    }

    /// Combined taxonomy condition, or `None` when there are no filters.
    fn filter_condition(&self) -> Option<Cond> {
        let set = &self.query.filter_set;
        if set.is_empty() {
            return None;
        }

        let mut cond = match set.effective_relation() {
            Some(Relation::Or) => Cond::any(),
            _ => Cond::all(),
        };
        for filter in &set.filters {
            cond = cond.add(filter_condition(filter));
        }
        Some(cond)
    }

    fn add_sorts(&self, select: &mut SelectStatement) {
        let order = match self.query.order_direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        match self.query.order_field.as_str() {
            "rand" => {
                select.order_by_expr(Expr::cust("RANDOM()"), Order::Asc);
            }
            "title" => {
                select.order_by_expr(Expr::cust("LOWER(\"item\".\"title\")"), order);
            }
            field => {
                select.order_by((Alias::new(ITEM), Alias::new(sort_column(field))), order);
            }
        }

        if self.query.order_field != "id" {
            select.order_by((Alias::new(ITEM), Alias::new("id")), Order::Asc);
        }
    }
}

/// Integer status stored in the `item.status` column.
pub fn status_code(status: ItemStatus) -> i16 {
    match status {
        ItemStatus::Draft => 0,
        ItemStatus::Published => 1,
        ItemStatus::Private => 2,
    }
}

/// Column backing an order field; unknown fields sort by creation date.
fn sort_column(field: &str) -> &'static str {
    match field {
        "name" => "slug",
        "menu_order" => "menu_order",
        "id" => "id",
        "modified" => "changed",
        _ => "created",
    }
}

fn item_col(column: &str) -> Expr {
    Expr::col((Alias::new(ITEM), Alias::new(column)))
}

fn term_col(column: &str) -> Expr {
    Expr::col((Alias::new(ITEM_TERM), Alias::new(column)))
}

/// Every clause of a filter must hold.
fn filter_condition(filter: &TermFilter) -> Cond {
    filter
        .clauses()
        .fold(Cond::all(), |cond, clause| cond.add(clause_condition(&clause)))
}

fn clause_condition(clause: &TermClause<'_>) -> Cond {
    match clause.operator {
        TermOperator::In => Cond::all().add(Expr::exists(term_subquery(
            clause.taxonomy,
            terms_condition(clause.taxonomy, clause.terms, clause.include_children),
        ))),
        TermOperator::And => clause.terms.iter().fold(Cond::all(), |cond, term| {
            cond.add(Expr::exists(term_subquery(
                clause.taxonomy,
                terms_condition(
                    clause.taxonomy,
                    std::slice::from_ref(term),
                    clause.include_children,
                ),
            )))
        }),
        TermOperator::NotIn => {
            let none = Cond::all().not().add(Expr::exists(term_subquery(
                clause.taxonomy,
                terms_condition(clause.taxonomy, clause.terms, clause.include_children),
            )));
            let mut cond = Cond::all();
            if clause.require_assigned {
                cond = cond.add(Expr::exists(term_subquery(clause.taxonomy, None)));
            }
            cond.add(none)
        }
    }
}

/// `SELECT 1 FROM item_term WHERE item_id = item.id AND taxonomy = ? [AND ...]`
fn term_subquery(taxonomy: &str, terms: Option<SimpleExpr>) -> SelectStatement {
    let mut sub = Query::select();
    sub.expr(Expr::cust("1"))
        .from(Alias::new(ITEM_TERM))
        .and_where(term_col("item_id").equals((Alias::new(ITEM), Alias::new("id"))))
        .and_where(term_col("taxonomy").eq(taxonomy));
    if let Some(terms) = terms {
        sub.and_where(terms);
    }
    sub
}

fn terms_condition(taxonomy: &str, terms: &[String], include_children: bool) -> Option<SimpleExpr> {
    let expr = if include_children {
        descendants_expr(taxonomy, terms)
    } else {
        term_col("term_slug").is_in(terms.iter().map(String::as_str))
    };
    Some(expr)
}

/// `item_term.term_slug` within the given terms or any of their descendants.
fn descendants_expr(taxonomy: &str, terms: &[String]) -> SimpleExpr {
    let seeds = (0..terms.len())
        .map(|i| format!("(${})", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        r#""item_term"."term_slug" IN (WITH RECURSIVE term_descendants(slug) AS (VALUES {seeds} UNION SELECT h.slug FROM term_hierarchy h INNER JOIN term_descendants d ON h.parent_slug = d.slug WHERE h.taxonomy = $1) SELECT slug FROM term_descendants)"#
    );
    let values = std::iter::once(taxonomy.to_string()).chain(terms.iter().cloned());
    Expr::cust_with_values(sql, values)
}
