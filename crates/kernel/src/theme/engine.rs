//! Theme engine with Tera templates and suggestion resolution.

use std::path::Path;

use dashmap::DashMap;
use tera::Tera;
use tracing::debug;

use crate::error::KinshipResult;
use crate::params::DisplayMode;

/// Templates compiled into the binary; a template directory may override any of them.
const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    (
        "related/wrapper.html",
        include_str!("../../templates/related/wrapper.html"),
    ),
    (
        "related/list.html",
        include_str!("../../templates/related/list.html"),
    ),
    (
        "related/grid.html",
        include_str!("../../templates/related/grid.html"),
    ),
    (
        "related/slider.html",
        include_str!("../../templates/related/slider.html"),
    ),
];

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping suggestion lists to resolved template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a theme engine from the embedded templates.
    pub fn new() -> KinshipResult<Self> {
        Self::with_overrides(None)
    }

    /// Create a theme engine, letting `*.html` files under `template_dir`
    /// replace or add to the embedded templates.
    ///
    /// Override names are relative to the directory, e.g. `related/grid.html`
    /// or `related/grid--practice_area.html`.
    pub fn with_overrides(template_dir: Option<&Path>) -> KinshipResult<Self> {
        let mut tera = match template_dir {
            Some(dir) => {
                let pattern = dir.join("**/*.html");
                let pattern_str = pattern
                    .to_str()
                    .ok_or_else(|| tera::Error::msg("invalid template directory path"))?;
                Tera::new(pattern_str)?
            }
            None => Tera::default(),
        };

        let mut embedded = Tera::default();
        embedded.add_raw_templates(EMBEDDED_TEMPLATES.iter().copied())?;
        // Existing (override) templates win over embedded ones.
        tera.extend(&embedded)?;

        Self::configure(&mut tera);

        debug!(
            count = tera.get_template_names().count(),
            overrides = template_dir.is_some(),
            "loaded templates"
        );

        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// HTML autoescaping without `/` escaping, so URLs stay readable.
    fn configure(tera: &mut Tera) {
        tera.set_escape_fn(escape_html);
    }

    /// Get the underlying Tera instance for custom operations.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    /// Example suggestions: `["related/grid--practice_area", "related/grid"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let cache_key = suggestions.join("|");
        if let Some(cached) = self.suggestion_cache.get(&cache_key) {
            return Some(cached.clone());
        }

        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                self.suggestion_cache
                    .insert(cache_key, template_name.clone());
                return Some(template_name);
            }
        }

        None
    }

    /// Template suggestions for a layout, most specific first:
    /// - `related/{display}--{content_type}`
    /// - `related/{display}`
    pub fn related_suggestions(display: DisplayMode, content_type: &str) -> Vec<String> {
        vec![
            format!("related/{}--{content_type}", display.as_str()),
            format!("related/{}", display.as_str()),
        ]
    }

    /// Render a template by name.
    pub fn render(&self, template: &str, context: &tera::Context) -> KinshipResult<String> {
        Ok(self.tera.render(template, context)?)
    }

    /// Clear the suggestion cache.
    pub fn clear_cache(&self) {
        self.suggestion_cache.clear();
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .field("cache_size", &self.suggestion_cache.len())
            .finish()
    }
}

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
