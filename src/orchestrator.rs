//! Composition orchestrator
//!
//! A [`Composer`] is one mounted composition: a template with a resolved
//! theme, feature flags, a responsive tracker, and the element store. It
//! builds a single [`RenderContext`] per render and hands it to the page
//! dispatcher.
//!
//! # Example
//!
//! ```rust
//! use site_composer::{CompositionProps, Composer, TemplateRegistry, ThemeArena};
//!
//! let mut arena = ThemeArena::new();
//! let mut composer = Composer::mount(
//!     TemplateRegistry::builtin(),
//!     CompositionProps::new("bistro").with_edit_mode(true),
//!     &mut arena,
//! )
//! .unwrap();
//!
//! composer.open_session("home.hero.title").unwrap();
//! composer.mutate_field("home.hero.title", "text", "Welcome in").unwrap();
//! composer.commit("home.hero.title").unwrap();
//!
//! assert!(composer.render().html.contains("Welcome in"));
//! ```

use std::fmt;

use serde_json::Value;

use crate::config::OverrideTable;
use crate::dispatch::{Dispatched, RenderContext, Route};
use crate::element::{EditError, ElementStore, StagedOverride};
use crate::error::CompositionError;
use crate::events::{ChangeListener, ElementEvent, Outbox, PendingSave, SaveStatus, SaveTicket};
use crate::features::{FeatureFlagSet, FeatureKey, FeatureSummary};
use crate::renderer::{HtmlBuilder, HtmlConfig, RootAttributes};
use crate::responsive::{classify, Breakpoint, ResizeEvent, ResponsiveTracker, Viewport};
use crate::service::{Ack, ServiceError, WebsiteData, WebsiteDataService};
use crate::template::{
    available_pages, PageInfo, PageKey, TemplateDefinition, TemplateRegistry,
};
use crate::theme::{AppliedTheme, ThemeArena, ThemeLease, ThemeResolver, ThemeScope, DEFAULT_THEME};

/// Scope id used when the host does not pick one
pub const DEFAULT_SCOPE: &str = "site";

/// Inputs of a composition
#[derive(Debug, Clone)]
pub struct CompositionProps {
    pub template_id: String,
    /// Theme name; `None` selects the default theme
    pub theme: Option<String>,
    pub features: FeatureFlagSet,
    /// Requested page key as the host supplied it
    pub page: String,
    pub edit_mode: bool,
    pub website: WebsiteData,
    pub viewport: Viewport,
    /// Where theme tokens are applied
    pub scope: ThemeScope,
    pub html: HtmlConfig,
    /// Previously saved overrides to restore on mount
    pub overrides: OverrideTable,
}

impl CompositionProps {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            theme: None,
            features: FeatureFlagSet::new(),
            page: PageKey::DEFAULT.to_string(),
            edit_mode: false,
            website: WebsiteData::default(),
            viewport: Viewport::default(),
            scope: ThemeScope::scoped(DEFAULT_SCOPE),
            html: HtmlConfig::default(),
            overrides: OverrideTable::new(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_features(mut self, features: FeatureFlagSet) -> Self {
        self.features = features;
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = page.into();
        self
    }

    pub fn with_edit_mode(mut self, edit_mode: bool) -> Self {
        self.edit_mode = edit_mode;
        self
    }

    pub fn with_website(mut self, website: WebsiteData) -> Self {
        self.website = website;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_scope(mut self, scope: ThemeScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_html_config(mut self, html: HtmlConfig) -> Self {
        self.html = html;
        self
    }

    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Output of one render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub html: String,
    /// Page actually rendered
    pub page: PageKey,
    pub dispatched: Dispatched,
    pub breakpoint: Breakpoint,
}

/// A rendered page, or the explicit not-found document
#[derive(Debug)]
pub enum RenderOutcome {
    Page(RenderedPage),
    NotFound {
        html: String,
        error: CompositionError,
    },
}

impl RenderOutcome {
    pub fn html(&self) -> &str {
        match self {
            RenderOutcome::Page(page) => &page.html,
            RenderOutcome::NotFound { html, .. } => html,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderOutcome::NotFound { .. })
    }
}

/// A mounted composition
pub struct Composer<'r> {
    registry: &'r TemplateRegistry,
    template: &'r TemplateDefinition,
    theme: AppliedTheme,
    theme_lease: ThemeLease,
    features: FeatureFlagSet,
    requested_page: String,
    edit_mode: bool,
    website: WebsiteData,
    responsive: ResponsiveTracker,
    elements: ElementStore,
    html: HtmlConfig,
    outbox: Outbox,
    listeners: Vec<ChangeListener>,
}

impl<'r> Composer<'r> {
    /// Resolve template and theme, seed the elements, and apply the theme
    ///
    /// The theme scope in `props` must not be held by another live
    /// composition on `arena`.
    pub fn mount(
        registry: &'r TemplateRegistry,
        props: CompositionProps,
        arena: &mut ThemeArena,
    ) -> Result<Self, CompositionError> {
        let template = registry.lookup(&props.template_id)?;
        let theme_name = props.theme.as_deref().unwrap_or(DEFAULT_THEME);
        let tokens = ThemeResolver::new(registry).resolve(&template.id, Some(theme_name))?;

        let mut elements = ElementStore::from_seeds(&template.elements);
        for (element_id, fields) in &props.overrides {
            elements.restore_override(
                element_id,
                fields.iter().map(|(field, value)| (field.as_str(), value.as_str())),
            )?;
        }

        let (theme_lease, theme) = arena.claim(&props.scope, theme_name, tokens)?;
        tracing::info!(
            template = %template.id,
            theme = theme_name,
            elements = elements.len(),
            restored = props.overrides.len(),
            "composition mounted"
        );

        Ok(Self {
            registry,
            template,
            theme,
            theme_lease,
            features: props.features,
            requested_page: props.page,
            edit_mode: props.edit_mode,
            website: props.website,
            responsive: ResponsiveTracker::from_viewport(props.viewport),
            elements,
            html: props.html,
            outbox: Outbox::new(),
            listeners: Vec::new(),
        })
    }

    /// Release the theme scope this composition holds
    pub fn unmount(self, arena: &mut ThemeArena) {
        if arena.release(self.theme_lease).is_none() {
            tracing::warn!(scope = %self.theme.scope, "theme scope was already released");
        }
    }

    pub fn template(&self) -> &'r TemplateDefinition {
        self.template
    }

    pub fn theme(&self) -> &AppliedTheme {
        &self.theme
    }

    pub fn features(&self) -> FeatureFlagSet {
        self.features
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn website(&self) -> &WebsiteData {
        &self.website
    }

    pub fn elements(&self) -> &ElementStore {
        &self.elements
    }

    /// Current responsive class, computed from the latest input
    pub fn breakpoint(&self) -> Breakpoint {
        self.responsive.breakpoint()
    }

    /// Pages the navigation offers under the current flags
    pub fn available_pages(&self) -> Vec<&'r PageInfo> {
        available_pages(self.template, &self.features)
    }

    fn route(&self, pages: &[&PageInfo]) -> Route {
        self.template
            .page_table(self.edit_mode)
            .route(&self.requested_page, |key| {
                pages.iter().any(|page| page.key == key)
            })
    }

    /// Page a render would show right now
    pub fn current_page(&self) -> PageKey {
        self.route(&self.available_pages()).page
    }

    /// Render the current page
    pub fn render(&self) -> RenderedPage {
        let pages = self.available_pages();
        let route = self.route(&pages);
        let breakpoint = self.breakpoint();

        let ctx = RenderContext {
            page: route.page,
            template: self.template,
            theme: &self.theme,
            features: self.features,
            edit_mode: self.edit_mode,
            website: &self.website,
            breakpoint,
            pages: &pages,
            elements: &self.elements,
        };

        let mut out = HtmlBuilder::new(self.html.clone());
        let page_name = self
            .template
            .page(route.page)
            .map_or(route.page.as_str(), |page| page.name.as_str());
        out.set_title(format!("{} | {}", ctx.business_name(), page_name));
        out.add_theme(&self.theme);
        out.add_base_styles();
        self.template.page_table(self.edit_mode).render(&ctx, &mut out);

        let html = out.build(&RootAttributes {
            scope: self.theme.scope.subtree_id(),
            template_id: &self.template.id,
            page: route.page,
            breakpoint,
            edit_mode: self.edit_mode,
        });

        RenderedPage {
            html,
            page: route.page,
            dispatched: route.dispatched,
            breakpoint,
        }
    }

    /// Switch to another theme of the same template
    ///
    /// On failure the current theme stays applied.
    pub fn set_theme(
        &mut self,
        arena: &mut ThemeArena,
        theme_name: Option<&str>,
    ) -> Result<(), CompositionError> {
        let name = theme_name.unwrap_or(DEFAULT_THEME);
        let tokens = ThemeResolver::new(self.registry).resolve(&self.template.id, Some(name))?;
        self.theme = arena.apply(self.theme_lease, name, tokens)?;
        Ok(())
    }

    pub fn set_page(&mut self, page: impl Into<String>) {
        self.requested_page = page.into();
    }

    /// Turn edit mode on or off; turning it off cancels every open session
    ///
    /// Returns how many sessions were cancelled.
    pub fn set_edit_mode(&mut self, edit_mode: bool) -> usize {
        self.edit_mode = edit_mode;
        if edit_mode {
            return 0;
        }
        let cancelled = self.elements.cancel_all();
        if cancelled > 0 {
            tracing::debug!(cancelled, "edit mode off, open sessions cancelled");
        }
        cancelled
    }

    /// Feed a container measurement; stale events are ignored
    pub fn on_container_resize(&mut self, event: ResizeEvent) -> Breakpoint {
        self.responsive.observe(event);
        self.breakpoint()
    }

    /// Force a device class, or return to measured width with `None`
    pub fn set_device_preview(&mut self, device: Option<Breakpoint>) -> Breakpoint {
        self.responsive.set_override(device);
        self.breakpoint()
    }

    pub fn on_feature_toggle(&mut self, key: FeatureKey, enabled: bool) -> FeatureSummary {
        self.features = self.features.set(key, enabled);
        self.summary()
    }

    /// Toggle a flag by name; unknown names are rejected
    pub fn on_feature_toggle_by_name(
        &mut self,
        name: &str,
        enabled: bool,
    ) -> Result<FeatureSummary, CompositionError> {
        self.features = self.features.set_by_name(name, enabled)?;
        Ok(self.summary())
    }

    /// Feature-derived counts for summary displays
    pub fn summary(&self) -> FeatureSummary {
        self.features.summary()
    }

    /// Register a listener for commits and save outcomes
    pub fn on_element_change<F>(&mut self, listener: F)
    where
        F: FnMut(&ElementEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, event: &ElementEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn open_session(&mut self, element_id: &str) -> Result<(), CompositionError> {
        if !self.edit_mode {
            return Err(EditError::EditModeDisabled {
                element_id: element_id.into(),
            }
            .into());
        }
        self.elements.open_session(element_id)?;
        Ok(())
    }

    pub fn mutate_field(
        &mut self,
        element_id: &str,
        field: &str,
        value: &str,
    ) -> Result<(), CompositionError> {
        self.elements.mutate_field(element_id, field, value)?;
        Ok(())
    }

    /// Commit the element's session and queue its save
    ///
    /// A draft failing validation stays open and nothing is queued.
    pub fn commit(&mut self, element_id: &str) -> Result<SaveTicket, CompositionError> {
        let change = self.elements.commit(element_id)?;
        let page = self.elements.page_of(element_id).unwrap_or(PageKey::DEFAULT);
        let page_id = self.page_id(page);

        let save = self.outbox.enqueue(page, &page_id, change);
        let ticket = save.ticket;
        let event = save.event(SaveStatus::Pending);
        self.notify(&event);
        Ok(ticket)
    }

    /// Discard the element's session; `false` when none was open
    pub fn cancel(&mut self, element_id: &str) -> Result<bool, CompositionError> {
        Ok(self.elements.cancel(element_id)?)
    }

    /// Hand queued saves to the host for persisting
    pub fn take_pending_saves(&mut self) -> Vec<PendingSave> {
        self.outbox.take()
    }

    /// Record the outcome of a save; `false` for an unknown ticket
    ///
    /// Failures are reported to listeners; committed state is kept.
    pub fn report_save(&mut self, ticket: SaveTicket, result: Result<(), ServiceError>) -> bool {
        let Some(save) = self.outbox.settle(ticket) else {
            tracing::warn!(%ticket, "save reported for unknown ticket");
            return false;
        };
        let status = match result {
            Ok(()) => SaveStatus::Saved,
            Err(error) => {
                tracing::warn!(
                    %ticket,
                    element = %save.change.element_id,
                    %error,
                    "element save failed"
                );
                SaveStatus::Failed(error.to_string())
            }
        };
        self.notify(&save.event(status));
        true
    }

    fn page_id(&self, page: PageKey) -> String {
        self.template
            .page(page)
            .map_or_else(|| page.to_string(), |info| info.id.clone())
    }

    /// Save every override of the current page in one content patch
    pub fn save_page(&self, service: &dyn WebsiteDataService) -> Result<Ack, CompositionError> {
        let page = self.current_page();
        let page_id = self.page_id(page);
        let patch = self.elements.page_patch(page);
        match service.update_page_content(&page_id, &patch) {
            Ok(ack) => {
                tracing::info!(page = %page, revision = ack.revision, "page saved");
                Ok(ack)
            }
            Err(error) => {
                tracing::warn!(page = %page, %error, "page save failed");
                Err(error.into())
            }
        }
    }

    /// Restore overrides from stored page content `{element id: {field: value}}`
    ///
    /// Every entry is checked before any is applied. Returns how many
    /// elements were restored.
    pub fn restore_page_content(&mut self, content: &Value) -> Result<usize, CompositionError> {
        let staged = self.stage_page_content(content)?;
        let restored = staged.len();
        self.elements.apply_staged(staged);
        Ok(restored)
    }

    /// Restore the saved content of every page of `website_id`
    ///
    /// Nothing is applied unless every page's content checks out.
    pub fn load_saved_pages(
        &mut self,
        service: &dyn WebsiteDataService,
        website_id: &str,
    ) -> Result<usize, CompositionError> {
        let mut staged = Vec::new();
        for record in service.fetch_pages(website_id)? {
            staged.extend(self.stage_page_content(&record.content)?);
        }
        let restored = staged.len();
        self.elements.apply_staged(staged);
        Ok(restored)
    }

    fn stage_page_content(
        &self,
        content: &Value,
    ) -> Result<Vec<StagedOverride>, CompositionError> {
        let Value::Object(entries) = content else {
            return Ok(Vec::new());
        };
        let mut staged = Vec::with_capacity(entries.len());
        for (element_id, fields) in entries {
            if self.elements.get(element_id).is_none() {
                tracing::debug!(element = %element_id, "skipping stored content of unknown element");
                continue;
            }
            let Value::Object(fields) = fields else {
                return Err(EditError::invalid_value(
                    "content",
                    fields.to_string(),
                    format!("stored content of {element_id} is not an object"),
                )
                .into());
            };
            let mut pairs = Vec::with_capacity(fields.len());
            for (field, value) in fields {
                let value = match value {
                    Value::String(text) => text.clone(),
                    Value::Number(_) | Value::Bool(_) => value.to_string(),
                    other => {
                        return Err(EditError::invalid_value(
                            "content",
                            other.to_string(),
                            format!("stored {element_id}.{field} is not a scalar"),
                        )
                        .into())
                    }
                };
                pairs.push((field.as_str(), value));
            }
            staged.push(self.elements.stage_override(
                element_id,
                pairs.iter().map(|(field, value)| (*field, value.as_str())),
            )?);
        }
        Ok(staged)
    }
}

impl fmt::Debug for Composer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("template", &self.template.id)
            .field("theme", &self.theme.name)
            .field("features", &self.features)
            .field("requested_page", &self.requested_page)
            .field("edit_mode", &self.edit_mode)
            .field("responsive", &self.responsive)
            .field("elements", &self.elements.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Mount and render once; unknown templates or themes yield a not-found
/// document instead of an error
pub fn render_or_not_found(
    registry: &TemplateRegistry,
    props: CompositionProps,
    arena: &mut ThemeArena,
) -> Result<RenderOutcome, CompositionError> {
    let template_id = props.template_id.clone();
    let html_config = props.html.clone();
    let breakpoint = classify(props.viewport);

    match Composer::mount(registry, props, arena) {
        Ok(composer) => {
            let page = composer.render();
            composer.unmount(arena);
            Ok(RenderOutcome::Page(page))
        }
        Err(error) if error.is_not_found() => {
            tracing::debug!(template = %template_id, %error, "rendering not-found document");
            let mut out = HtmlBuilder::new(html_config);
            out.set_title("Not found");
            out.add_base_styles();
            out.start_section("not-found");
            out.add_static_text("h1", "Site not found", "title");
            out.add_static_text("p", &error.to_string(), "message");
            out.end_section();
            let html = out.build(&RootAttributes {
                scope: None,
                template_id: &template_id,
                page: PageKey::DEFAULT,
                breakpoint,
                edit_mode: false,
            });
            Ok(RenderOutcome::NotFound { html, error })
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::template::pages::{ABOUT_TITLE, CONTACT_SUBMIT, HOME_BOOKING, HOME_TITLE};
    use pretty_assertions::assert_eq;

    fn mount(props: CompositionProps) -> Composer<'static> {
        let mut arena = ThemeArena::new();
        Composer::mount(TemplateRegistry::builtin(), props, &mut arena).expect("Should mount")
    }

    #[test]
    fn test_mount_applies_default_theme() {
        let mut arena = ThemeArena::new();
        let composer =
            Composer::mount(TemplateRegistry::builtin(), CompositionProps::new("bistro"), &mut arena)
                .unwrap();
        assert_eq!(composer.theme().name, DEFAULT_THEME);
        assert!(arena.get(&ThemeScope::scoped(DEFAULT_SCOPE)).is_some());
        composer.unmount(&mut arena);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_unmount_releases_only_own_scope() {
        let mut arena = ThemeArena::new();
        let first = Composer::mount(
            TemplateRegistry::builtin(),
            CompositionProps::new("bistro").with_scope(ThemeScope::scoped("a")),
            &mut arena,
        )
        .unwrap();
        let second = Composer::mount(
            TemplateRegistry::builtin(),
            CompositionProps::new("studio").with_scope(ThemeScope::scoped("b")),
            &mut arena,
        )
        .unwrap();

        first.unmount(&mut arena);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(&ThemeScope::scoped("a")).is_none());
        assert_eq!(
            arena.get(&ThemeScope::scoped("b")).map(|theme| theme.tokens.primary.as_str()),
            Some("#111111")
        );
        second.unmount(&mut arena);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_unknown_template_and_theme() {
        let mut arena = ThemeArena::new();
        let err = Composer::mount(
            TemplateRegistry::builtin(),
            CompositionProps::new("bakery"),
            &mut arena,
        )
        .unwrap_err();
        assert!(err.is_not_found());

        let err = Composer::mount(
            TemplateRegistry::builtin(),
            CompositionProps::new("bistro").with_theme("neon"),
            &mut arena,
        )
        .unwrap_err();
        assert!(err.is_not_found());
        assert!(arena.is_empty());
    }

    #[test]
    fn test_disabled_page_falls_back_to_home() {
        let mut composer = mount(CompositionProps::new("bistro").with_page("about"));
        let rendered = composer.render();
        assert_eq!(rendered.page, PageKey::Home);
        assert!(rendered.dispatched.is_fallback());

        composer.on_feature_toggle(FeatureKey::AboutPage, true);
        let rendered = composer.render();
        assert_eq!(rendered.page, PageKey::About);
        assert_eq!(rendered.dispatched, Dispatched::Exact);
    }

    #[test]
    fn test_page_missing_from_template_falls_back() {
        let composer = mount(
            CompositionProps::new("studio")
                .with_features(FeatureFlagSet::all())
                .with_page("services"),
        );
        assert_eq!(composer.render().page, PageKey::Home);
    }

    #[test]
    fn test_render_reflects_breakpoint_changes() {
        let mut composer = mount(CompositionProps::new("clinic"));
        assert_eq!(composer.render().breakpoint, Breakpoint::Desktop);

        assert_eq!(composer.on_container_resize(ResizeEvent::new(1, 400)), Breakpoint::Mobile);
        let rendered = composer.render();
        assert!(rendered.html.contains(r#"data-breakpoint="mobile""#));

        // A late event from before the last one changes nothing
        composer.on_container_resize(ResizeEvent::new(0, 1200));
        assert_eq!(composer.breakpoint(), Breakpoint::Mobile);

        assert_eq!(
            composer.set_device_preview(Some(Breakpoint::Tablet)),
            Breakpoint::Tablet
        );
        assert_eq!(composer.set_device_preview(None), Breakpoint::Mobile);
    }

    #[test]
    fn test_set_theme() {
        let mut arena = ThemeArena::new();
        let mut composer =
            Composer::mount(TemplateRegistry::builtin(), CompositionProps::new("bistro"), &mut arena)
                .unwrap();
        composer.set_theme(&mut arena, Some("olive")).unwrap();
        assert_eq!(composer.theme().name, "olive");
        assert!(composer.render().html.contains("--color-primary: #4f5d2f;"));

        assert!(composer.set_theme(&mut arena, Some("neon")).is_err());
        assert_eq!(composer.theme().name, "olive");
    }

    #[test]
    fn test_editing_requires_edit_mode() {
        let mut composer = mount(CompositionProps::new("bistro"));
        let err = composer.open_session(HOME_TITLE).unwrap_err();
        assert!(matches!(
            err,
            CompositionError::Edit(EditError::EditModeDisabled { .. })
        ));
    }

    #[test]
    fn test_leaving_edit_mode_cancels_sessions() {
        let mut composer = mount(CompositionProps::new("bistro").with_edit_mode(true));
        composer.open_session(HOME_TITLE).unwrap();
        composer.mutate_field(HOME_TITLE, "text", "Draft").unwrap();
        assert_eq!(composer.set_edit_mode(false), 1);
        assert!(!composer.elements().get(HOME_TITLE).unwrap().has_session());
        assert!(!composer.render().html.contains("Draft"));
    }

    #[test]
    fn test_commit_queues_save_and_notifies() {
        let mut composer = mount(CompositionProps::new("bistro").with_edit_mode(true));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        composer.on_element_change(move |event| sink.borrow_mut().push(event.status.clone()));

        composer.open_session(HOME_TITLE).unwrap();
        composer.mutate_field(HOME_TITLE, "text", "Hello").unwrap();
        let ticket = composer.commit(HOME_TITLE).unwrap();

        let saves = composer.take_pending_saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].ticket, ticket);
        assert_eq!(saves[0].page_id, "bistro-home");

        assert!(composer.report_save(ticket, Err(ServiceError::Unavailable {
            reason: "offline".to_string(),
        })));
        assert!(!composer.report_save(ticket, Ok(())));

        assert_eq!(
            *events.borrow(),
            vec![
                SaveStatus::Pending,
                SaveStatus::Failed("service unavailable: offline".to_string())
            ]
        );
        // Failure keeps the committed text
        assert!(composer.render().html.contains("Hello"));
    }

    #[test]
    fn test_rejected_commit_queues_nothing() {
        let mut composer = mount(CompositionProps::new("bistro").with_edit_mode(true));
        composer.open_session(HOME_TITLE).unwrap();
        composer.mutate_field(HOME_TITLE, "text", "   ").unwrap();
        let err = composer.commit(HOME_TITLE).unwrap_err();
        assert!(err.is_validation());
        assert!(composer.take_pending_saves().is_empty());
        assert!(composer
            .render()
            .html
            .contains(r#"role="alert">text: must not be empty</span>"#));
    }

    #[test]
    fn test_capability_flags_gate_elements() {
        let mut composer = mount(CompositionProps::new("bistro"));
        assert!(!composer.render().html.contains("Book a table"));
        composer.on_feature_toggle(FeatureKey::OnlineBooking, true);
        assert!(composer.render().html.contains("Book a table"));
        assert!(composer.elements().get(HOME_BOOKING).is_some());
    }

    #[test]
    fn test_summary_uses_flag_counts() {
        let mut composer = mount(CompositionProps::new("bistro"));
        composer.on_feature_toggle(FeatureKey::ContactPage, true);
        let summary = composer
            .on_feature_toggle_by_name("newsletter", true)
            .unwrap();
        assert_eq!(summary.enabled_pages, 2);
        assert_eq!(summary.enabled_features, 2);
        assert!(composer.on_feature_toggle_by_name("teleport", true).is_err());
    }

    #[test]
    fn test_restore_page_content() {
        let mut composer = mount(CompositionProps::new("bistro"));
        let restored = composer
            .restore_page_content(&serde_json::json!({
                CONTACT_SUBMIT: {"title": "Write to us", "fontWeight": 700}
            }))
            .unwrap();
        assert_eq!(restored, 1);
        let button = composer.elements().button(CONTACT_SUBMIT, false).unwrap();
        assert_eq!(button.content.title, "Write to us");
        assert_eq!(button.content.font_weight, "700");

        assert!(composer
            .restore_page_content(&serde_json::json!({ HOME_TITLE: {"iconId": "star"} }))
            .is_err());
        let stale = serde_json::json!({ "retired.banner": {"text": "Closed"} });
        assert_eq!(composer.restore_page_content(&stale).unwrap(), 0);
    }

    #[test]
    fn test_failed_restore_applies_nothing() {
        let mut composer = mount(CompositionProps::new("bistro"));
        let before = composer.elements().clone();

        let mixed = serde_json::json!({
            ABOUT_TITLE: {"text": "Restored"},
            HOME_TITLE: {"iconId": "star"}
        });
        assert!(composer.restore_page_content(&mixed).is_err());
        assert_eq!(composer.elements(), &before);

        let blank = serde_json::json!({
            ABOUT_TITLE: {"text": "Restored"},
            HOME_TITLE: {"text": "   "}
        });
        assert!(matches!(
            composer.restore_page_content(&blank),
            Err(CompositionError::Edit(EditError::Validation(_)))
        ));
        assert_eq!(composer.elements(), &before);
    }

    #[test]
    fn test_render_or_not_found() {
        let mut arena = ThemeArena::new();
        let outcome = render_or_not_found(
            TemplateRegistry::builtin(),
            CompositionProps::new("bakery"),
            &mut arena,
        )
        .unwrap();
        assert!(outcome.is_not_found());
        assert!(outcome.html().contains("template not found: bakery"));

        let outcome = render_or_not_found(
            TemplateRegistry::builtin(),
            CompositionProps::new("bistro"),
            &mut arena,
        )
        .unwrap();
        assert!(!outcome.is_not_found());
        assert!(arena.is_empty());
    }
}
