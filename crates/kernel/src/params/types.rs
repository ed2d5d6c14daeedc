//! Resolved display configuration types.

use serde::{Deserialize, Serialize};

use crate::gather::{Relation, SortDirection, TermOperator};

/// Presentational layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    List,
    Grid,
    Slider,
}

impl DisplayMode {
    /// Resolve a user-supplied display mode.
    ///
    /// Trimmed and lowercased; anything other than `list`, `grid` or
    /// `slider` resolves to `list`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "grid" => Self::Grid,
            "slider" => Self::Slider,
            _ => Self::List,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
            Self::Slider => "slider",
        }
    }
}

/// Smallest column count for any breakpoint.
pub const MIN_COLUMNS: u8 = 1;

/// Largest column count for any breakpoint.
pub const MAX_COLUMNS: u8 = 6;

/// Responsive column counts, widest breakpoint first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Columns {
    pub lg: u8,
    pub md: u8,
    pub sm: u8,
    pub xs: u8,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            lg: 4,
            md: 3,
            sm: 2,
            xs: 1,
        }
    }
}

impl Columns {
    /// `[lg, md, sm, xs]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.lg, self.md, self.sm, self.xs]
    }

    pub fn from_array([lg, md, sm, xs]: [u8; 4]) -> Self {
        Self { lg, md, sm, xs }
    }
}

/// Validated display configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Content type machine name.
    pub content_type: String,

    /// Maximum number of items (≥ 1).
    pub limit: u32,

    /// Field to order by.
    pub order_field: String,

    pub order_direction: SortDirection,

    pub display_mode: DisplayMode,

    pub columns: Columns,
}

/// Everything the resolver extracts from raw attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParams {
    pub config: DisplayConfig,

    /// Category CSV, after the current-item fallback.
    pub category: String,

    /// Location CSV.
    pub location: String,

    /// Location taxonomy override as supplied (validated by the filter builder).
    pub location_taxonomy: Option<String>,

    pub relation: Relation,

    pub operator: TermOperator,
}
