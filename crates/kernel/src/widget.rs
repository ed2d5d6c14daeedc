//! The related-content widget.
//!
//! `RelatedContent` owns its collaborators and a renderer. Each call runs
//! resolve → build → execute → render for one current item.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{KinshipError, KinshipResult};
use crate::gather::{CATEGORY_TAXONOMY, ContentQuery, FilterQueryBuilder, build_query};
use crate::host::{ContentStore, ContentTypes, PrimaryTermSource, TaxonomyRegistry};
use crate::models::ContentItem;
use crate::params::{ParameterResolver, RawAttributes, ResolvedParams};
use crate::theme::RelatedRenderer;

/// The item the widget is displayed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrentItem(pub Uuid);

impl From<Uuid> for CurrentItem {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Host services the widget depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub content_types: Arc<dyn ContentTypes>,
    pub taxonomies: Arc<dyn TaxonomyRegistry>,
    pub primary_terms: Arc<dyn PrimaryTermSource>,
    pub store: Arc<dyn ContentStore>,
}

impl Collaborators {
    /// Use one host object for every collaborator.
    pub fn uniform<H>(host: Arc<H>) -> Self
    where
        H: ContentTypes + TaxonomyRegistry + PrimaryTermSource + ContentStore + 'static,
    {
        Self {
            content_types: host.clone(),
            taxonomies: host.clone(),
            primary_terms: host.clone(),
            store: host,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Resolved parameters and the query they produce.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub params: ResolvedParams,
    /// Location taxonomy actually used, if any.
    pub location_taxonomy: Option<String>,
    pub query: ContentQuery,
}

/// Related-content widget.
#[derive(Debug)]
pub struct RelatedContent {
    collaborators: Collaborators,
    renderer: RelatedRenderer,
}

impl RelatedContent {
    pub fn new(collaborators: Collaborators, renderer: RelatedRenderer) -> Self {
        Self {
            collaborators,
            renderer,
        }
    }

    pub fn renderer(&self) -> &RelatedRenderer {
        &self.renderer
    }

    /// Resolve attributes and build the store query without executing it.
    pub fn plan(&self, current: Option<CurrentItem>, raw: &RawAttributes) -> RenderPlan {
        let c = &self.collaborators;
        let resolver = ParameterResolver::new(c.content_types.as_ref(), c.taxonomies.as_ref());

        let params = resolver.resolve(raw, || {
            current
                .map(|item| {
                    c.primary_terms
                        .primary_or_all_slugs(item.0, CATEGORY_TAXONOMY)
                })
                .unwrap_or_default()
        });

        let builder = FilterQueryBuilder::new(c.taxonomies.as_ref(), &params.config.content_type);
        let location_taxonomy =
            builder.resolve_location_taxonomy(params.location_taxonomy.as_deref());
        let filter_set = builder.build(
            &params.category,
            &params.location,
            params.relation,
            params.operator,
            location_taxonomy.as_deref(),
        );

        let query = build_query(&params.config, filter_set, current.map(|item| item.0));
        RenderPlan {
            params,
            location_taxonomy,
            query,
        }
    }

    /// Execute a query against the content store.
    pub fn try_fetch(&self, query: &ContentQuery) -> KinshipResult<Vec<ContentItem>> {
        self.collaborators
            .store
            .query(query)
            .map_err(KinshipError::Store)
    }

    /// Execute a query; store failures are logged and yield no items.
    pub fn fetch(&self, query: &ContentQuery) -> Vec<ContentItem> {
        match self.try_fetch(query) {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    error = %e,
                    content_type = %query.content_type,
                    "related content query failed"
                );
                Vec::new()
            }
        }
    }

    /// Render related content for the current item.
    ///
    /// Returns an empty string when nothing matches.
    pub fn render(&self, current: Option<CurrentItem>, raw: &RawAttributes) -> KinshipResult<String> {
        let plan = self.plan(current, raw);
        debug!(
            content_type = %plan.query.content_type,
            filters = plan.query.filter_set.len(),
            limit = plan.query.limit,
            "related content query planned"
        );

        let items = self.fetch(&plan.query);
        if items.is_empty() {
            debug!("no related content");
            return Ok(String::new());
        }

        let html = self.renderer.render(&items, &plan.params.config)?;
        info!(
            display = plan.params.config.display_mode.as_str(),
            items = items.len(),
            wrapper = self.renderer.config().wrapper_class.as_str(),
            "rendered related content"
        );
        Ok(html)
    }

    /// Render from shortcode attribute text.
    pub fn render_shortcode(&self, current: Option<CurrentItem>, text: &str) -> KinshipResult<String> {
        self.render(current, &RawAttributes::parse_shortcode(text))
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::gather::{Relation, TermOperator};
    use crate::theme::ThemeEngine;

    /// Host whose store always fails.
    struct BrokenStore;

    impl ContentTypes for BrokenStore {
        fn type_exists(&self, name: &str) -> bool {
            name == "post"
        }
    }

    impl TaxonomyRegistry for BrokenStore {
        fn taxonomy_exists(&self, name: &str) -> bool {
            name == "category"
        }

        fn is_attached_to_type(&self, _taxonomy: &str, content_type: &str) -> bool {
            content_type == "post"
        }

        fn taxonomies_for_type(&self, _content_type: &str) -> Vec<String> {
            vec!["category".to_string()]
        }
    }

    impl PrimaryTermSource for BrokenStore {
        fn primary_or_all_slugs(&self, _item_id: Uuid, _taxonomy: &str) -> String {
            "injury,-ignored".to_string()
        }
    }

    impl ContentStore for BrokenStore {
        fn query(&self, _query: &ContentQuery) -> anyhow::Result<Vec<ContentItem>> {
            anyhow::bail!("connection refused")
        }
    }

    fn widget() -> RelatedContent {
        let renderer = RelatedRenderer::with_engine(ThemeEngine::new().unwrap(), Config::default());
        RelatedContent::new(Collaborators::uniform(Arc::new(BrokenStore)), renderer)
    }

    #[test]
    fn store_failure_renders_nothing() {
        let w = widget();
        let html = w
            .render(Some(CurrentItem(Uuid::nil())), &RawAttributes::new())
            .unwrap();
        assert_eq!(html, "");
    }

    #[test]
    fn try_fetch_surfaces_store_errors() {
        let w = widget();
        let plan = w.plan(None, &RawAttributes::new());
        assert!(matches!(w.try_fetch(&plan.query), Err(KinshipError::Store(_))));
    }

    #[test]
    fn plan_defaults_category_from_current_item() {
        let w = widget();
        let plan = w.plan(Some(CurrentItem(Uuid::nil())), &RawAttributes::new());
        assert_eq!(plan.params.category, "injury,-ignored");

        let category = plan.query.filter_set.for_taxonomy("category").unwrap();
        assert_eq!(category.include, vec!["injury"]);
        assert_eq!(category.exclude, vec!["ignored"]);
        assert_eq!(plan.query.exclude_ids, vec![Uuid::nil()]);
        assert!(plan.location_taxonomy.is_none());
    }

    #[test]
    fn plan_without_current_item_has_no_default_category() {
        let w = widget();
        let plan = w.plan(None, &RawAttributes::new());
        assert_eq!(plan.params.category, "");
        assert!(plan.query.filter_set.is_empty());
        assert!(plan.query.exclude_ids.is_empty());
    }

    #[test]
    fn plan_carries_relation_and_operator() {
        let w = widget();
        let raw = RawAttributes::parse_shortcode(r#"category="a,b" relation=or operator=and"#);
        let plan = w.plan(None, &raw);
        assert_eq!(plan.query.filter_set.relation, Relation::Or);
        let category = plan.query.filter_set.for_taxonomy("category").unwrap();
        assert_eq!(category.operator, TermOperator::And);
    }
}
