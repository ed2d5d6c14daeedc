//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Default CSS class on the wrapper element.
pub const DEFAULT_WRAPPER_CLASS: &str = "kinship-related-content";

/// Default custom field holding a card title override.
pub const DEFAULT_TITLE_FIELD: &str = "practice_area_page_title";

/// Default custom field holding a card icon URL.
pub const DEFAULT_ICON_FIELD: &str = "practice_area_page_icon";

/// Default custom field holding a card background image URL.
pub const DEFAULT_IMAGE_FIELD: &str = "practice_area_page_image";

/// Rendering configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Class on the stable wrapper `<div>` (default: kinship-related-content).
    pub wrapper_class: String,

    /// Item field overriding the displayed title when non-empty.
    pub title_field: String,

    /// Item field holding the card icon URL.
    pub icon_field: String,

    /// Item field holding the card background image URL.
    pub image_field: String,

    /// Icon used when an item has none.
    pub default_icon_url: String,

    /// Background image used when an item has neither an image field nor a thumbnail.
    pub default_image_url: Option<String>,

    /// Directory of override templates (`related/*.html`).
    pub template_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrapper_class: DEFAULT_WRAPPER_CLASS.to_string(),
            title_field: DEFAULT_TITLE_FIELD.to_string(),
            icon_field: DEFAULT_ICON_FIELD.to_string(),
            image_field: DEFAULT_IMAGE_FIELD.to_string(),
            default_icon_url: "/assets/related-icon.png".to_string(),
            default_image_url: None,
            template_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset or blank values keep the default.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let wrapper_class = non_blank_var("KINSHIP_WRAPPER_CLASS").unwrap_or(defaults.wrapper_class);
        let title_field = non_blank_var("KINSHIP_TITLE_FIELD").unwrap_or(defaults.title_field);
        let icon_field = non_blank_var("KINSHIP_ICON_FIELD").unwrap_or(defaults.icon_field);
        let image_field = non_blank_var("KINSHIP_IMAGE_FIELD").unwrap_or(defaults.image_field);
        let default_icon_url =
            non_blank_var("KINSHIP_DEFAULT_ICON_URL").unwrap_or(defaults.default_icon_url);
        let default_image_url = non_blank_var("KINSHIP_DEFAULT_IMAGE_URL");
        let template_dir = non_blank_var("KINSHIP_TEMPLATE_DIR").map(PathBuf::from);

        if let Some(ref dir) = template_dir
            && !dir.is_dir()
        {
            anyhow::bail!(
                "KINSHIP_TEMPLATE_DIR must point to a directory: {}",
                dir.display()
            );
        }

        Ok(Self {
            wrapper_class,
            title_field,
            icon_field,
            image_field,
            default_icon_url,
            default_image_url,
            template_dir,
        })
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
