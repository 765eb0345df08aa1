//! HTML generation for composed pages

use crate::element::{
    ButtonContent, EditableContent, IconContent, RenderedElement, TextContent, ValidationError,
};
use crate::responsive::Breakpoint;
use crate::template::PageKey;
use crate::theme::AppliedTheme;

use super::HtmlConfig;

/// Layout rules shared by every template; `{p}` is the class prefix
const BASE_CSS: &str = "\
.{p}site { font-family: system-ui, sans-serif; color: var(--color-secondary); margin: 0; }
.{p}nav { display: flex; gap: 16px; padding: 16px 24px; background: var(--color-primary); }
.{p}nav a { color: var(--color-highlight); text-decoration: none; }
.{p}nav a.{p}active { border-bottom: 2px solid var(--color-accent); }
.{p}section { padding: 48px 24px; }
.{p}grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 24px; }
.{p}tablet .{p}grid { grid-template-columns: repeat(2, 1fr); }
.{p}mobile .{p}grid { grid-template-columns: 1fr; }
.{p}mobile .{p}nav { flex-direction: column; }
.{p}button { border: none; cursor: pointer; }
.{p}editable { outline: 1px dashed var(--color-accent); cursor: text; }
.{p}editing { outline: 2px solid var(--color-highlight); }
.{p}validation-error { color: #c62828; font-size: 12px; }";

/// Attributes placed on the root element of a rendered page
#[derive(Debug, Clone)]
pub struct RootAttributes<'a> {
    /// Theme scope id; `None` for document-wide themes
    pub scope: Option<&'a str>,
    pub template_id: &'a str,
    pub page: PageKey,
    pub breakpoint: Breakpoint,
    pub edit_mode: bool,
}

/// Build HTML incrementally
#[derive(Debug)]
pub struct HtmlBuilder {
    config: HtmlConfig,
    title: Option<String>,
    styles: Vec<String>,
    body: Vec<String>,
    indent: usize,
}

impl HtmlBuilder {
    /// Create a new HTML builder
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            title: None,
            styles: vec![],
            body: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.prefix().to_string()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push(&mut self, line: String) {
        let indent = self.indent_str();
        self.body.push(format!("{}{}", indent, line));
    }

    fn class_list(&self, names: &[&str]) -> String {
        let prefix = self.prefix();
        names
            .iter()
            .map(|name| format!("{}{}", prefix, name))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Add the theme's custom properties; emitted ahead of the body
    pub fn add_theme(&mut self, theme: &AppliedTheme) {
        let prefix = self.prefix();
        self.styles.push(theme.css(&prefix));
    }

    /// Add the shared layout rules
    pub fn add_base_styles(&mut self) {
        let prefix = self.prefix();
        self.styles.push(BASE_CSS.replace("{p}", &prefix));
    }

    /// Open a container element
    pub fn start(&mut self, tag: &str, classes: &[&str]) {
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, self.class_list(classes))
        };
        self.push(format!("<{}{}>", tag, class_attr));
        self.indent += 1;
    }

    /// Close a container element
    pub fn end(&mut self, tag: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.push(format!("</{}>", tag));
    }

    /// Open a page section
    pub fn start_section(&mut self, name: &str) {
        self.start("section", &["section", name]);
    }

    pub fn end_section(&mut self) {
        self.end("section");
    }

    /// Add non-editable text
    pub fn add_static_text(&mut self, tag: &str, text: &str, class: &str) {
        let class_attr = self.class_list(&[class]);
        self.push(format!(
            r#"<{tag} class="{}">{}</{tag}>"#,
            class_attr,
            escape_html(text)
        ));
    }

    /// Add a navigation link
    pub fn add_link(&mut self, href: &str, text: &str, active: bool) {
        let class_attr = if active {
            format!(r#" class="{}""#, self.class_list(&["active"]))
        } else {
            String::new()
        };
        self.push(format!(
            r#"<a href="{}"{}>{}</a>"#,
            escape_html(href),
            class_attr,
            escape_html(text)
        ));
    }

    /// Class list and data attributes for an element's edit affordance
    fn affordance<C: EditableContent>(
        &self,
        rendered: &RenderedElement<C>,
        base: &[&str],
    ) -> (String, String) {
        let mut names: Vec<&str> = base.to_vec();
        if rendered.editable {
            names.push("editable");
        }
        if rendered.editing {
            names.push("editing");
        }
        let attrs = if rendered.editable {
            format!(
                r#" data-element-id="{}" data-element-kind="{}" tabindex="0""#,
                escape_html(rendered.id.as_str()),
                C::KIND
            )
        } else {
            String::new()
        };
        (self.class_list(&names), attrs)
    }

    fn add_validation_error(&mut self, error: Option<&ValidationError>) {
        if let Some(error) = error {
            let class_attr = self.class_list(&["validation-error"]);
            self.push(format!(
                r#"<span class="{}" role="alert">{}</span>"#,
                class_attr,
                escape_html(&error.to_string())
            ));
        }
    }

    /// Add an editable text element
    pub fn add_text(&mut self, tag: &str, rendered: &RenderedElement<TextContent>) {
        let (classes, attrs) = self.affordance(rendered, &["text"]);
        self.push(format!(
            r#"<{tag} class="{}"{}>{}</{tag}>"#,
            classes,
            attrs,
            escape_html(&rendered.content.text)
        ));
        self.add_validation_error(rendered.error.as_ref());
    }

    /// Add an editable icon element
    pub fn add_icon(&mut self, rendered: &RenderedElement<IconContent>) {
        let (classes, attrs) = self.affordance(rendered, &["icon"]);
        self.push(format!(
            r#"<span class="{}" data-icon="{}" aria-hidden="true"{}>{}</span>"#,
            classes,
            escape_html(&rendered.content.icon_id),
            attrs,
            rendered.content.glyph()
        ));
        self.add_validation_error(rendered.error.as_ref());
    }

    /// Add an editable button element
    pub fn add_button(&mut self, rendered: &RenderedElement<ButtonContent>) {
        let (classes, attrs) = self.affordance(rendered, &["button"]);
        self.push(format!(
            r#"<button type="button" class="{}" style="{}"{}>{}</button>"#,
            classes,
            escape_html(&rendered.content.inline_style()),
            attrs,
            escape_html(&rendered.content.title)
        ));
        self.add_validation_error(rendered.error.as_ref());
    }

    /// Build the final HTML string
    pub fn build(self, root: &RootAttributes<'_>) -> String {
        let nl = self.newline();
        let prefix = self.prefix();
        let mut html = String::new();

        if self.config.standalone {
            html.push_str("<!DOCTYPE html>");
            html.push_str(nl);
            html.push_str(&format!(r#"<html lang="{}">"#, escape_html(&self.config.lang)));
            html.push_str(nl);
            html.push_str("<head>");
            html.push_str(nl);
            html.push_str(r#"  <meta charset="utf-8">"#);
            html.push_str(nl);
            html.push_str(
                r#"  <meta name="viewport" content="width=device-width, initial-scale=1">"#,
            );
            html.push_str(nl);
            if let Some(title) = &self.title {
                html.push_str(&format!("  <title>{}</title>", escape_html(title)));
                html.push_str(nl);
            }
        }

        // Theme tokens precede the body so the first paint is already themed
        if !self.styles.is_empty() {
            html.push_str("  <style>");
            html.push_str(nl);
            for style in &self.styles {
                for line in style.lines() {
                    html.push_str("    ");
                    html.push_str(line);
                    html.push_str(nl);
                }
            }
            html.push_str("  </style>");
            html.push_str(nl);
        }

        if self.config.standalone {
            html.push_str("</head>");
            html.push_str(nl);
            html.push_str("<body>");
            html.push_str(nl);
        }

        let scope_attr = root
            .scope
            .map(|scope| format!(r#" data-{}scope="{}""#, prefix, escape_html(scope)))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<div class="{p}site {p}{bp}"{scope} data-template="{template}" data-page="{page}" data-breakpoint="{bp}" data-mode="{mode}">"#,
            p = prefix,
            bp = root.breakpoint,
            scope = scope_attr,
            template = escape_html(root.template_id),
            page = root.page,
            mode = if root.edit_mode { "edit" } else { "display" },
        ));
        html.push_str(nl);

        for line in &self.body {
            html.push_str(line);
            html.push_str(nl);
        }

        html.push_str("</div>");
        if self.config.standalone {
            html.push_str(nl);
            html.push_str("</body>");
            html.push_str(nl);
            html.push_str("</html>");
        }

        html
    }
}

/// Escape special HTML characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
