//! Site Composer - template composition and in-place editing for small-business websites
//!
//! This library assembles a website from a pluggable template, lets users
//! edit individual text, icon and button elements in place, and renders the
//! result to HTML for a responsive preview.
//!
//! # Example
//!
//! ```rust
//! use site_composer::{render_page, CompositionProps};
//!
//! let html = render_page(CompositionProps::new("bistro")).unwrap();
//! assert!(html.contains("<!DOCTYPE html>"));
//! assert!(html.contains(r#"data-template="bistro""#));
//! ```

pub mod config;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod events;
pub mod features;
pub mod orchestrator;
pub mod renderer;
pub mod responsive;
pub mod service;
pub mod template;
pub mod theme;

pub use config::{ConfigError, SiteConfig};
pub use dispatch::{Dispatched, PageTable, RenderContext};
pub use element::{EditError, ElementId, ValidationError};
pub use error::CompositionError;
pub use events::{ElementEvent, PendingSave, SaveStatus, SaveTicket};
pub use features::{FeatureError, FeatureFlagSet, FeatureKey, FeatureSummary};
pub use orchestrator::{render_or_not_found, Composer, CompositionProps, RenderOutcome, RenderedPage};
pub use renderer::HtmlConfig;
pub use responsive::{classify, Breakpoint, ResizeEvent, Viewport};
pub use service::{InMemoryWebsiteService, ServiceError, WebsiteData, WebsiteDataService};
pub use template::{PageKey, TemplateError, TemplateRegistry};
pub use theme::{ThemeArena, ThemeError, ThemeLease, ThemeScope, ThemeTokens};

/// Render one page of a built-in template with a private theme arena
///
/// This is the simplest entry point: mount, render once, unmount.
///
/// # Example
///
/// ```rust
/// use site_composer::{render_page, CompositionProps, FeatureFlagSet, HtmlConfig};
///
/// let props = CompositionProps::new("clinic")
///     .with_features(FeatureFlagSet::all())
///     .with_page("contact")
///     .with_html_config(HtmlConfig::default().with_standalone(false));
///
/// let html = render_page(props).unwrap();
/// assert!(html.starts_with("  <style>"));
/// assert!(html.contains(r#"data-page="contact""#));
/// ```
pub fn render_page(props: CompositionProps) -> Result<String, CompositionError> {
    let mut arena = ThemeArena::new();
    let composer = Composer::mount(TemplateRegistry::builtin(), props, &mut arena)?;
    let rendered = composer.render();
    composer.unmount(&mut arena);
    Ok(rendered.html)
}
