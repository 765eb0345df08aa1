//! Page dispatch: page key to page renderer
//!
//! A [`PageTable`] always holds a renderer for the default page, so routing
//! is total: an unparseable key, a key the template does not offer, or a page
//! switched off by feature flags all render the default page instead.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::element::ElementStore;
use crate::features::FeatureFlagSet;
use crate::renderer::HtmlBuilder;
use crate::responsive::Breakpoint;
use crate::service::WebsiteData;
use crate::template::{PageInfo, PageKey, TemplateDefinition};
use crate::theme::AppliedTheme;

/// Draws one page into the builder
pub type PageRenderer = Arc<dyn Fn(&RenderContext<'_>, &mut HtmlBuilder) + Send + Sync>;

/// Everything a page renderer may read; the same shape for every page
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// The page being rendered, after fallback
    pub page: PageKey,
    pub template: &'a TemplateDefinition,
    pub theme: &'a AppliedTheme,
    pub features: FeatureFlagSet,
    pub edit_mode: bool,
    pub website: &'a WebsiteData,
    pub breakpoint: Breakpoint,
    /// Pages available for navigation
    pub pages: &'a [&'a PageInfo],
    pub elements: &'a ElementStore,
}

impl<'a> RenderContext<'a> {
    pub fn template_id(&self) -> &'a str {
        &self.template.id
    }

    /// Display name of the business, from website data or the template
    pub fn business_name(&self) -> &'a str {
        self.website
            .get_str("businessName")
            .unwrap_or(self.template.name.as_str())
    }

    /// Draw a text element, skipping ids the store does not hold
    pub fn text(&self, out: &mut HtmlBuilder, tag: &str, id: &str) {
        match self.elements.text(id, self.edit_mode) {
            Some(rendered) => out.add_text(tag, &rendered),
            None => missing(id, "text"),
        }
    }

    pub fn icon(&self, out: &mut HtmlBuilder, id: &str) {
        match self.elements.icon(id, self.edit_mode) {
            Some(rendered) => out.add_icon(&rendered),
            None => missing(id, "icon"),
        }
    }

    pub fn button(&self, out: &mut HtmlBuilder, id: &str) {
        match self.elements.button(id, self.edit_mode) {
            Some(rendered) => out.add_button(&rendered),
            None => missing(id, "button"),
        }
    }
}

fn missing(id: &str, kind: &str) {
    tracing::warn!(element = id, kind, "page references an element the template does not seed");
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("page", &self.page)
            .field("template", &self.template.id)
            .field("theme", &self.theme.name)
            .field("features", &self.features)
            .field("edit_mode", &self.edit_mode)
            .field("breakpoint", &self.breakpoint)
            .finish_non_exhaustive()
    }
}

/// Which branch routing took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// The requested page was rendered
    Exact,
    /// The default page was rendered in place of `requested`
    Fallback { requested: String },
}

impl Dispatched {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Dispatched::Fallback { .. })
    }
}

/// Result of routing a requested key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub page: PageKey,
    pub dispatched: Dispatched,
}

/// Renderers keyed by page, with the default page always present
#[derive(Clone)]
pub struct PageTable {
    renderers: BTreeMap<PageKey, PageRenderer>,
}

impl PageTable {
    /// Create a table holding the default page's renderer
    pub fn new<F>(default: F) -> Self
    where
        F: Fn(&RenderContext<'_>, &mut HtmlBuilder) + Send + Sync + 'static,
    {
        let mut renderers: BTreeMap<PageKey, PageRenderer> = BTreeMap::new();
        renderers.insert(PageKey::DEFAULT, Arc::new(default));
        Self { renderers }
    }

    /// Add or replace the renderer for `page`
    pub fn with<F>(mut self, page: PageKey, renderer: F) -> Self
    where
        F: Fn(&RenderContext<'_>, &mut HtmlBuilder) + Send + Sync + 'static,
    {
        self.renderers.insert(page, Arc::new(renderer));
        self
    }

    /// Add or replace a shared renderer for `page`
    pub fn with_shared(mut self, page: PageKey, renderer: PageRenderer) -> Self {
        self.renderers.insert(page, renderer);
        self
    }

    pub fn contains(&self, page: PageKey) -> bool {
        self.renderers.contains_key(&page)
    }

    /// Page keys in table order
    pub fn keys(&self) -> impl Iterator<Item = PageKey> + '_ {
        self.renderers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Route a host-supplied key
    ///
    /// `available` decides whether a page the table holds may be shown.
    pub fn route<F>(&self, requested: &str, available: F) -> Route
    where
        F: Fn(PageKey) -> bool,
    {
        match PageKey::parse(requested) {
            Some(page) if self.contains(page) && available(page) => Route {
                page,
                dispatched: Dispatched::Exact,
            },
            _ => {
                tracing::debug!(
                    requested,
                    fallback = %PageKey::DEFAULT,
                    "page not available, dispatching to default page"
                );
                Route {
                    page: PageKey::DEFAULT,
                    dispatched: Dispatched::Fallback {
                        requested: requested.to_string(),
                    },
                }
            }
        }
    }

    /// Draw `ctx.page`, or the default page if the table lacks it
    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut HtmlBuilder) {
        let renderer = self
            .renderers
            .get(&ctx.page)
            .or_else(|| self.renderers.get(&PageKey::DEFAULT));
        if let Some(renderer) = renderer {
            renderer(ctx, out);
        }
    }
}

impl fmt::Debug for PageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.renderers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PageTable {
        PageTable::new(|_, _| {}).with(PageKey::About, |_, _| {})
    }

    #[test]
    fn test_default_page_always_present() {
        let table = PageTable::new(|_, _| {});
        assert!(table.contains(PageKey::Home));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_exact_route() {
        let route = table().route("about", |_| true);
        assert_eq!(route.page, PageKey::About);
        assert_eq!(route.dispatched, Dispatched::Exact);
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let route = table().route("pricing", |_| true);
        assert_eq!(route.page, PageKey::Home);
        assert_eq!(
            route.dispatched,
            Dispatched::Fallback {
                requested: "pricing".to_string()
            }
        );
    }

    #[test]
    fn test_page_missing_from_table_falls_back() {
        let route = table().route("blog", |_| true);
        assert_eq!(route.page, PageKey::Home);
        assert!(route.dispatched.is_fallback());
    }

    #[test]
    fn test_unavailable_page_falls_back() {
        let route = table().route("about", |page| page == PageKey::Home);
        assert_eq!(route.page, PageKey::Home);
        assert!(route.dispatched.is_fallback());
    }

    #[test]
    fn test_debug_lists_keys() {
        assert_eq!(format!("{:?}", table()), "{Home, About}");
    }
}
