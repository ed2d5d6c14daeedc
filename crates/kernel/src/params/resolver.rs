//! Display parameter resolution.
//!
//! Turns raw attributes into a [`DisplayConfig`]. Resolution never fails:
//! every malformed value falls back to its documented default.

use tracing::debug;

use crate::gather::{CATEGORY_TAXONOMY, Relation, SortDirection, TermOperator};
use crate::host::{ContentTypes, TaxonomyRegistry};
use crate::services::sanitize_key;

use super::attributes::RawAttributes;
use super::types::{Columns, DisplayConfig, DisplayMode, MAX_COLUMNS, MIN_COLUMNS, ResolvedParams};

/// Content type used when the requested one is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "post";

/// Item limit when none is supplied.
pub const DEFAULT_LIMIT: u32 = 5;

/// Order field when none is supplied.
pub const DEFAULT_ORDER_FIELD: &str = "date";

/// Resolves raw attributes against the registered content types and taxonomies.
pub struct ParameterResolver<'a> {
    content_types: &'a dyn ContentTypes,
    taxonomies: &'a dyn TaxonomyRegistry,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(content_types: &'a dyn ContentTypes, taxonomies: &'a dyn TaxonomyRegistry) -> Self {
        Self {
            content_types,
            taxonomies,
        }
    }

    /// Resolve raw attributes.
    ///
    /// `context_taxonomy_default` is called at most once, only when no
    /// category filter was supplied and the resolved content type carries the
    /// category taxonomy. It should return the current item's primary
    /// category slug, or all of its category slugs as CSV.
    pub fn resolve<F>(&self, raw: &RawAttributes, context_taxonomy_default: F) -> ResolvedParams
    where
        F: FnOnce() -> String,
    {
        for key in raw.unknown_keys() {
            debug!(attribute = %key, "ignoring unknown attribute");
        }

        let content_type = self.resolve_content_type(raw.get_or("type", DEFAULT_CONTENT_TYPE));
        let (order_field, order_direction) = resolve_order(raw, &content_type);

        let config = DisplayConfig {
            limit: resolve_limit(raw.get("limit")),
            order_field,
            order_direction,
            display_mode: DisplayMode::parse(raw.get_or("display", "list")),
            columns: resolve_columns(raw.get_or("columns", "4,3,2,1")),
            content_type,
        };

        let mut category = raw.get_or("category", "").to_string();
        if category.is_empty() && self.taxonomies.applies(CATEGORY_TAXONOMY, &config.content_type)
        {
            category = context_taxonomy_default();
            debug!(
                content_type = %config.content_type,
                category = %category,
                "category filter defaulted from current item"
            );
        }

        let location_taxonomy = raw
            .explicit("location_tax")
            .map(str::to_string);

        ResolvedParams {
            category,
            location: raw.get_or("location", "").to_string(),
            location_taxonomy,
            relation: Relation::parse(raw.get_or("relation", "AND")),
            operator: TermOperator::parse(raw.get_or("operator", "IN")),
            config,
        }
    }

    /// Machine key of the requested type, or `post` when it is not registered.
    pub fn resolve_content_type(&self, raw: &str) -> String {
        let key = sanitize_key(raw);
        if self.content_types.type_exists(&key) {
            key
        } else {
            debug!(requested = %raw, "unknown content type, using default");
            DEFAULT_CONTENT_TYPE.to_string()
        }
    }
}

/// Resolve the order field and direction.
///
/// An explicit, non-empty `orderby` wins; otherwise `date`, except for pages
/// which default to `title` ascending. A `date` order without an explicit
/// `order` is always descending.
pub fn resolve_order(raw: &RawAttributes, content_type: &str) -> (String, SortDirection) {
    let mut direction = if raw.get_or("order", "DESC").eq_ignore_ascii_case("ASC") {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };

    let explicit_orderby = raw.explicit("orderby");
    let mut field = explicit_orderby
        .map(sanitize_key)
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_ORDER_FIELD.to_string());

    if content_type == "page" && explicit_orderby.is_none() {
        field = "title".to_string();
        direction = SortDirection::Asc;
    }
    if field == DEFAULT_ORDER_FIELD && raw.explicit("order").is_none() {
        direction = SortDirection::Desc;
    }

    (field, direction)
}

/// Parse an item limit, floored at 1.
///
/// Uses the integer part of the value's leading number (`"8 posts"` → 8,
/// `"1e3"` → 1000); values without one count as 0 and are raised to 1.
/// A missing value uses the default.
pub fn resolve_limit(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_LIMIT;
    };
    let n = leading_int(raw).max(1);
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Parse a `lg,md,sm,xs` column list.
///
/// Each slot takes its token when present and numeric, else the positional
/// default `[4,3,2,1]`. Every value is clamped into `[1,6]`.
pub fn resolve_columns(raw: &str) -> Columns {
    let defaults = Columns::default().to_array();
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();

    let mut resolved = defaults;
    for (i, slot) in resolved.iter_mut().enumerate() {
        let value = tokens
            .get(i)
            .and_then(|t| parse_numeric(t))
            .map_or(f64::from(defaults[i]), f64::trunc);
        *slot = value.clamp(f64::from(MIN_COLUMNS), f64::from(MAX_COLUMNS)) as u8;
    }

    Columns::from_array(resolved)
}

/// Integer value of a string's leading number, like a loose `(int)` cast.
///
/// Accepts optional whitespace, a sign, digits, a fraction and an exponent
/// (`"1e3"` is 1000, `"2.9 posts"` is 2). Anything else counts as 0.
fn leading_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return 0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    // Saturating float-to-int conversion; NaN maps to 0.
    s[..end].parse::<f64>().map_or(0, |v| v.trunc() as i64)
}

/// Parse a numeric token: decimal integers, decimals and exponents.
fn parse_numeric(token: &str) -> Option<f64> {
    let well_formed = !token.is_empty()
        && token.bytes().any(|b| b.is_ascii_digit())
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !well_formed {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}
