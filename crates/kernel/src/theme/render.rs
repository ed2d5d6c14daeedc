//! Related-content rendering.
//!
//! Turns query results into list, grid or slider markup and wraps the result
//! in the stable wrapper element.

use serde::Serialize;
use serde_json::json;
use tera::Context as TeraContext;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::KinshipResult;
use crate::models::ContentItem;
use crate::params::{Columns, DisplayConfig, DisplayMode};

use super::engine::ThemeEngine;

/// Prefix of the per-render slider class.
pub const SLIDER_CLASS_PREFIX: &str = "slider_pa_";

/// Display data for one item.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub link: String,
    /// Background image URL, if any.
    pub image: Option<String>,
    pub icon: String,
}

/// Renders related items with the theme engine.
#[derive(Debug)]
pub struct RelatedRenderer {
    engine: ThemeEngine,
    config: Config,
}

impl RelatedRenderer {
    /// Build a renderer, loading override templates from
    /// `config.template_dir` when set.
    pub fn new(config: Config) -> KinshipResult<Self> {
        let engine = ThemeEngine::with_overrides(config.template_dir.as_deref())?;
        Ok(Self { engine, config })
    }

    pub fn with_engine(engine: ThemeEngine, config: Config) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render items in the configured layout.
    ///
    /// An empty item list renders nothing, not even the wrapper.
    pub fn render(&self, items: &[ContentItem], display: &DisplayConfig) -> KinshipResult<String> {
        if items.is_empty() {
            return Ok(String::new());
        }

        let cards: Vec<CardView> = items.iter().map(|item| self.card(item)).collect();
        let inner = self.render_layout(&cards, display)?;
        self.wrap(&inner)
    }

    /// Render the layout markup without the wrapper.
    pub fn render_layout(&self, cards: &[CardView], display: &DisplayConfig) -> KinshipResult<String> {
        let mut context = TeraContext::new();
        context.insert("cards", cards);
        context.insert("content_type", &display.content_type);
        context.insert("display", display.display_mode.as_str());

        match display.display_mode {
            DisplayMode::List => {}
            DisplayMode::Grid => {
                context.insert("row_classes", &bootstrap_row_classes(display.columns));
            }
            DisplayMode::Slider => {
                context.insert("slider_class", &slider_class());
                context.insert(
                    "slider_settings",
                    &slider_settings(display.columns).to_string(),
                );
            }
        }

        let suggestions =
            ThemeEngine::related_suggestions(display.display_mode, &display.content_type);
        let suggestion_refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
        let template = self
            .engine
            .resolve_template(&suggestion_refs)
            .unwrap_or_else(|| format!("related/{}.html", display.display_mode.as_str()));

        debug!(template = %template, cards = cards.len(), "rendering related content");
        self.engine.render(&template, &context)
    }

    /// Wrap rendered markup in the stable wrapper element.
    pub fn wrap(&self, inner: &str) -> KinshipResult<String> {
        let mut context = TeraContext::new();
        context.insert("wrapper_class", &self.config.wrapper_class);
        context.insert("content", inner.trim());
        let html = self.engine.render("related/wrapper.html", &context)?;
        Ok(html.trim().to_string())
    }

    /// Card data for an item.
    ///
    /// Title, icon and image come from the configured item fields, falling
    /// back to the item title, the default icon, and the thumbnail or
    /// default image respectively.
    pub fn card(&self, item: &ContentItem) -> CardView {
        let config = &self.config;
        CardView {
            title: item
                .get_text(&config.title_field)
                .unwrap_or_else(|| item.title.clone()),
            link: item.link(),
            image: item
                .get_text(&config.image_field)
                .or_else(|| item.thumbnail_url.clone().filter(|u| !u.trim().is_empty()))
                .or_else(|| config.default_image_url.clone()),
            icon: item
                .get_text(&config.icon_field)
                .unwrap_or_else(|| config.default_icon_url.clone()),
        }
    }
}

/// Bootstrap row classes for a column configuration.
pub fn bootstrap_row_classes(columns: Columns) -> String {
    format!(
        "row row-cols-{} row-cols-sm-{} row-cols-md-{} row-cols-lg-{} g-3",
        columns.xs, columns.sm, columns.md, columns.lg
    )
}

/// Carousel settings for the `data-slick` attribute.
pub fn slider_settings(columns: Columns) -> serde_json::Value {
    json!({
        "slidesToShow": columns.lg,
        "slidesToScroll": 1,
        "arrows": true,
        "dots": true,
        "autoplay": true,
        "autoplaySpeed": 2000,
        "responsive": [
            { "breakpoint": 1400, "settings": { "slidesToShow": columns.md } },
            { "breakpoint": 992, "settings": { "slidesToShow": columns.sm } },
            { "breakpoint": 768, "settings": { "slidesToShow": columns.xs } },
        ],
    })
}

/// A fresh slider class, unique per render.
pub fn slider_class() -> String {
    format!("{SLIDER_CLASS_PREFIX}{}", Uuid::now_v7().simple())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn item(json: serde_json::Value) -> ContentItem {
        serde_json::from_value(json).unwrap()
    }

    fn renderer() -> RelatedRenderer {
        RelatedRenderer::with_engine(ThemeEngine::new().unwrap(), Config::default())
    }

    #[test]
    fn row_classes_follow_breakpoints() {
        assert_eq!(
            bootstrap_row_classes(Columns::default()),
            "row row-cols-1 row-cols-sm-2 row-cols-md-3 row-cols-lg-4 g-3"
        );
    }

    #[test]
    fn slider_settings_shape() {
        let settings = slider_settings(Columns::from_array([5, 4, 3, 2]));
        assert_eq!(settings["slidesToShow"], 5);
        assert_eq!(settings["slidesToScroll"], 1);
        assert_eq!(settings["autoplaySpeed"], 2000);
        assert_eq!(settings["arrows"], true);
        let responsive = settings["responsive"].as_array().unwrap();
        assert_eq!(responsive.len(), 3);
        assert_eq!(responsive[0]["breakpoint"], 1400);
        assert_eq!(responsive[0]["settings"]["slidesToShow"], 4);
        assert_eq!(responsive[1]["breakpoint"], 992);
        assert_eq!(responsive[1]["settings"]["slidesToShow"], 3);
        assert_eq!(responsive[2]["breakpoint"], 768);
        assert_eq!(responsive[2]["settings"]["slidesToShow"], 2);
    }

    #[test]
    fn slider_classes_are_unique() {
        let a = slider_class();
        let b = slider_class();
        assert!(a.starts_with("slider_pa_"));
        assert_ne!(a, b);
    }

    #[test]
    fn card_prefers_configured_fields() {
        let r = renderer();
        let card = r.card(&item(serde_json::json!({
            "id": Uuid::nil(),
            "type": "post",
            "title": "Plain",
            "permalink": "/plain",
            "thumbnail_url": "/thumb.jpg",
            "fields": {
                "practice_area_page_title": {"value": "Fancy"},
                "practice_area_page_icon": "/icon.svg",
                "practice_area_page_image": "/bg.jpg"
            }
        })));
        assert_eq!(card.title, "Fancy");
        assert_eq!(card.link, "/plain");
        assert_eq!(card.icon, "/icon.svg");
        assert_eq!(card.image.as_deref(), Some("/bg.jpg"));
    }

    #[test]
    fn card_fallbacks() {
        let r = renderer();
        let card = r.card(&item(serde_json::json!({
            "id": Uuid::nil(),
            "type": "post",
            "title": "Plain",
            "thumbnail_url": "/thumb.jpg",
            "fields": { "practice_area_page_title": "  " }
        })));
        assert_eq!(card.title, "Plain");
        assert_eq!(card.icon, Config::default().default_icon_url);
        assert_eq!(card.image.as_deref(), Some("/thumb.jpg"));

        let card = r.card(&item(serde_json::json!({
            "id": Uuid::nil(), "type": "post", "title": "Bare"
        })));
        assert!(card.image.is_none());
    }

    #[test]
    fn empty_items_render_nothing() {
        let display = DisplayConfig {
            content_type: "post".to_string(),
            limit: 5,
            order_field: "date".to_string(),
            order_direction: crate::gather::SortDirection::Desc,
            display_mode: DisplayMode::Grid,
            columns: Columns::default(),
        };
        assert_eq!(renderer().render(&[], &display).unwrap(), "");
    }

    #[test]
    fn wrap_uses_configured_class() {
        let config = Config {
            wrapper_class: "related-box".to_string(),
            ..Config::default()
        };
        let r = RelatedRenderer::with_engine(ThemeEngine::new().unwrap(), config);
        assert_eq!(
            r.wrap("<ol></ol>\n").unwrap(),
            r#"<div class="related-box"><ol></ol></div>"#
        );
    }
}
