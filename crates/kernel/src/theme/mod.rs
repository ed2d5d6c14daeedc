//! Theme engine and related-content rendering.
//!
//! Provides Tera-based rendering of the list, grid and slider layouts with
//! template suggestion resolution and optional on-disk overrides.

mod engine;
mod render;

pub use engine::{ThemeEngine, escape_html};
pub use render::{
    CardView, RelatedRenderer, SLIDER_CLASS_PREFIX, bootstrap_row_classes, slider_class,
    slider_settings,
};
