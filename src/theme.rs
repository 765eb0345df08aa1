//! Named color themes per template
//!
//! Each template ships a set of named [`ThemeTokens`] parsed from a
//! compiled-in TOML palette. Tokens are applied to the rendered output as CSS
//! custom properties, either scoped to one preview subtree or document-wide.
//! A [`ThemeArena`] keeps the two modes from being mixed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CompositionError;
use crate::template::{TemplateError, TemplateRegistry};

/// Theme picked when none is named
pub const DEFAULT_THEME: &str = "default";

/// Errors that can occur when loading, resolving or applying themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to parse theme palette TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("theme '{theme}' not found for template '{template_id}'")]
    NotFound { template_id: String, theme: String },

    #[error("cannot apply a {requested} theme while {active} themes are active")]
    ModeConflict {
        requested: ThemeMode,
        active: ThemeMode,
    },

    #[error("theme scope {scope} is already claimed by another composition")]
    ScopeInUse { scope: ThemeScope },

    #[error("theme lease {lease} is no longer held in this arena")]
    Released { lease: ThemeLease },
}

/// Color roles a template can be painted with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTokens {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub highlight: String,
}

impl ThemeTokens {
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        accent: impl Into<String>,
        highlight: impl Into<String>,
    ) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            accent: accent.into(),
            highlight: highlight.into(),
        }
    }

    /// Role name and value pairs, in a fixed order
    pub fn roles(&self) -> [(&'static str, &str); 4] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
            ("highlight", &self.highlight),
        ]
    }

    /// CSS custom property declarations, e.g. `--color-primary: #123456;`
    pub fn css_declarations(&self) -> Vec<String> {
        self.roles()
            .iter()
            .map(|(role, value)| format!("--color-{}: {};", role, value))
            .collect()
    }
}

/// The named themes of one template
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSet {
    themes: BTreeMap<String, ThemeTokens>,
}

#[derive(Deserialize)]
struct TomlThemeSet {
    themes: BTreeMap<String, ThemeTokens>,
}

impl ThemeSet {
    /// Parse a palette of the form `[themes.<name>] primary = "..."`
    pub fn from_toml(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlThemeSet = toml::from_str(content)?;
        Ok(Self {
            themes: parsed.themes,
        })
    }

    pub fn get(&self, name: &str) -> Option<&ThemeTokens> {
        self.themes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Theme names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(|s| s.as_str())
    }
}

/// Resolves `(template, theme name)` to tokens against a registry
#[derive(Debug, Clone, Copy)]
pub struct ThemeResolver<'a> {
    registry: &'a TemplateRegistry,
}

impl<'a> ThemeResolver<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a theme; an omitted name selects [`DEFAULT_THEME`]
    pub fn resolve(
        &self,
        template_id: &str,
        theme_name: Option<&str>,
    ) -> Result<&'a ThemeTokens, CompositionError> {
        let template = self
            .registry
            .get(template_id)
            .ok_or_else(|| TemplateError::NotFound {
                template_id: template_id.to_string(),
            })?;
        let name = theme_name.unwrap_or(DEFAULT_THEME);
        let tokens = template
            .themes
            .get(name)
            .ok_or_else(|| ThemeError::NotFound {
                template_id: template_id.to_string(),
                theme: name.to_string(),
            })?;
        Ok(tokens)
    }
}

/// How far applied tokens reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Scoped,
    Global,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Scoped => write!(f, "scoped"),
            ThemeMode::Global => write!(f, "global"),
        }
    }
}

/// Where applied tokens land
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThemeScope {
    /// Only the subtree carrying this scope id
    Scoped(String),
    /// The whole document
    Global,
}

impl ThemeScope {
    pub fn scoped(subtree_id: impl Into<String>) -> Self {
        ThemeScope::Scoped(subtree_id.into())
    }

    pub fn mode(&self) -> ThemeMode {
        match self {
            ThemeScope::Scoped(_) => ThemeMode::Scoped,
            ThemeScope::Global => ThemeMode::Global,
        }
    }

    /// Subtree id for scoped application
    pub fn subtree_id(&self) -> Option<&str> {
        match self {
            ThemeScope::Scoped(id) => Some(id),
            ThemeScope::Global => None,
        }
    }

    /// CSS selector the tokens are attached to
    pub fn selector(&self, prefix: &str) -> String {
        match self {
            ThemeScope::Scoped(id) => {
                format!(r#"[data-{}scope="{}"]"#, prefix, escape_css_string(id))
            }
            ThemeScope::Global => ":root".to_string(),
        }
    }
}

impl fmt::Display for ThemeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeScope::Scoped(id) => write!(f, "'{}'", id),
            ThemeScope::Global => write!(f, ":root"),
        }
    }
}

/// Escape a value for a double-quoted CSS string inside a `<style>` block
fn escape_css_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if matches!(c, '<' | '>' | '&') || c.is_control() => {
                escaped.push_str(&format!("\\{:x} ", c as u32));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Tokens bound to a scope; this is the theme context handed to renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTheme {
    pub name: String,
    pub scope: ThemeScope,
    pub tokens: ThemeTokens,
}

impl AppliedTheme {
    /// CSS rule declaring the tokens on the scope selector
    pub fn css(&self, prefix: &str) -> String {
        format!(
            "{} {{ {} }}",
            self.scope.selector(prefix),
            self.tokens.css_declarations().join(" ")
        )
    }
}

/// Proof that a composition holds a scope in a [`ThemeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeLease(u64);

impl fmt::Display for ThemeLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Application {
    lease: ThemeLease,
    theme: AppliedTheme,
}

/// Registry of active theme applications keyed by subtree id
///
/// All applications in one arena share a single mode. Each scope has at most
/// one holder; only the holder's lease can re-theme or release it.
#[derive(Debug, Default)]
pub struct ThemeArena {
    next_lease: u64,
    scoped: BTreeMap<String, Application>,
    global: Option<Application>,
}

impl ThemeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode of the current applications, if any
    pub fn active_mode(&self) -> Option<ThemeMode> {
        if self.global.is_some() {
            Some(ThemeMode::Global)
        } else if !self.scoped.is_empty() {
            Some(ThemeMode::Scoped)
        } else {
            None
        }
    }

    /// Take `scope` and bind `tokens` to it
    ///
    /// Fails when the scope is already held or the arena runs in the other
    /// mode.
    pub fn claim(
        &mut self,
        scope: &ThemeScope,
        name: &str,
        tokens: &ThemeTokens,
    ) -> Result<(ThemeLease, AppliedTheme), ThemeError> {
        if let Some(active) = self.active_mode() {
            let requested = scope.mode();
            if active != requested {
                return Err(ThemeError::ModeConflict { requested, active });
            }
        }
        let occupied = match scope {
            ThemeScope::Scoped(id) => self.scoped.contains_key(id),
            ThemeScope::Global => self.global.is_some(),
        };
        if occupied {
            return Err(ThemeError::ScopeInUse {
                scope: scope.clone(),
            });
        }

        self.next_lease += 1;
        let lease = ThemeLease(self.next_lease);
        let theme = AppliedTheme {
            name: name.to_string(),
            scope: scope.clone(),
            tokens: tokens.clone(),
        };
        let application = Application {
            lease,
            theme: theme.clone(),
        };
        match scope {
            ThemeScope::Scoped(id) => {
                self.scoped.insert(id.clone(), application);
            }
            ThemeScope::Global => self.global = Some(application),
        }
        tracing::debug!(theme = name, %scope, %lease, "theme scope claimed");
        Ok((lease, theme))
    }

    /// Replace the tokens on the scope held by `lease`
    pub fn apply(
        &mut self,
        lease: ThemeLease,
        name: &str,
        tokens: &ThemeTokens,
    ) -> Result<AppliedTheme, ThemeError> {
        let application = self.held_mut(lease).ok_or(ThemeError::Released { lease })?;
        application.theme.name = name.to_string();
        application.theme.tokens = tokens.clone();
        tracing::debug!(theme = name, %lease, "theme applied");
        Ok(application.theme.clone())
    }

    /// Drop the application held by `lease`; other holders are untouched
    pub fn release(&mut self, lease: ThemeLease) -> Option<AppliedTheme> {
        if self.global.as_ref().is_some_and(|held| held.lease == lease) {
            return self.global.take().map(|held| held.theme);
        }
        let id = self
            .scoped
            .iter()
            .find(|(_, held)| held.lease == lease)
            .map(|(id, _)| id.clone())?;
        self.scoped.remove(&id).map(|held| held.theme)
    }

    pub fn get(&self, scope: &ThemeScope) -> Option<&AppliedTheme> {
        let held = match scope {
            ThemeScope::Scoped(id) => self.scoped.get(id),
            ThemeScope::Global => self.global.as_ref(),
        };
        held.map(|held| &held.theme)
    }

    /// Number of live applications
    pub fn len(&self) -> usize {
        self.scoped.len() + usize::from(self.global.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn held_mut(&mut self, lease: ThemeLease) -> Option<&mut Application> {
        if let Some(global) = self.global.as_mut().filter(|held| held.lease == lease) {
            return Some(global);
        }
        self.scoped.values_mut().find(|held| held.lease == lease)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: &str = r##"
[themes.default]
primary = "#111111"
secondary = "#222222"
accent = "#333333"
highlight = "#444444"

[themes.night]
primary = "#000000"
secondary = "#0a0a0a"
accent = "#ff00ff"
highlight = "#00ffff"
"##;

    fn tokens(primary: &str) -> ThemeTokens {
        ThemeTokens::new(primary, "#fff", "#000", "#f0f")
    }

    #[test]
    fn test_parse_palette() {
        let set = ThemeSet::from_toml(PALETTE).expect("Should parse");
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["default", "night"]);
        assert_eq!(set.get("night").map(|t| t.accent.as_str()), Some("#ff00ff"));
        assert!(set.get("day").is_none());
    }

    #[test]
    fn test_invalid_palette_error() {
        assert!(matches!(
            ThemeSet::from_toml("[themes.default]\nprimary = 1"),
            Err(ThemeError::Parse(_))
        ));
    }

    #[test]
    fn test_css_declarations() {
        let declarations = tokens("#123456").css_declarations();
        assert_eq!(declarations[0], "--color-primary: #123456;");
        assert_eq!(declarations[3], "--color-highlight: #f0f;");
    }

    #[test]
    fn test_scoped_css_targets_subtree() {
        let mut arena = ThemeArena::new();
        let (_, applied) = arena
            .claim(&ThemeScope::scoped("preview-1"), "default", &tokens("#abcdef"))
            .unwrap();
        let css = applied.css("sc-");
        assert!(css.starts_with(r#"[data-sc-scope="preview-1"] {"#));
        assert!(css.contains("--color-primary: #abcdef;"));
    }

    #[test]
    fn test_scope_id_is_escaped_in_selector() {
        let scope = ThemeScope::scoped(r#"a"b\c</style>"#);
        assert_eq!(
            scope.selector("sc-"),
            r#"[data-sc-scope="a\"b\\c\3c /style\3e "]"#
        );
    }

    #[test]
    fn test_global_css_targets_root() {
        let mut arena = ThemeArena::new();
        let (_, applied) = arena
            .claim(&ThemeScope::Global, "default", &tokens("#abcdef"))
            .unwrap();
        assert!(applied.css("sc-").starts_with(":root {"));
    }

    #[test]
    fn test_concurrent_scoped_previews_stay_separate() {
        let mut arena = ThemeArena::new();
        let a = ThemeScope::scoped("a");
        let b = ThemeScope::scoped("b");
        arena.claim(&a, "default", &tokens("#aaaaaa")).unwrap();
        arena.claim(&b, "default", &tokens("#bbbbbb")).unwrap();
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(&a).unwrap().tokens.primary, "#aaaaaa");
        assert_eq!(arena.get(&b).unwrap().tokens.primary, "#bbbbbb");
    }

    #[test]
    fn test_claimed_scope_is_refused() {
        let mut arena = ThemeArena::new();
        let scope = ThemeScope::scoped("site");
        arena.claim(&scope, "default", &tokens("#aaaaaa")).unwrap();
        let err = arena.claim(&scope, "night", &tokens("#000000")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "theme scope 'site' is already claimed by another composition"
        );
        assert_eq!(arena.get(&scope).unwrap().tokens.primary, "#aaaaaa");

        arena
            .claim(&ThemeScope::scoped("other"), "default", &tokens("#aaaaaa"))
            .unwrap();
        assert_eq!(arena.len(), 2);

        let mut global = ThemeArena::new();
        global.claim(&ThemeScope::Global, "default", &tokens("#aaaaaa")).unwrap();
        assert!(matches!(
            global.claim(&ThemeScope::Global, "default", &tokens("#bbbbbb")),
            Err(ThemeError::ScopeInUse { .. })
        ));
    }

    #[test]
    fn test_mixing_modes_is_rejected() {
        let mut arena = ThemeArena::new();
        let (lease, _) = arena
            .claim(&ThemeScope::scoped("a"), "default", &tokens("#aaaaaa"))
            .unwrap();
        let err = arena
            .claim(&ThemeScope::Global, "default", &tokens("#bbbbbb"))
            .unwrap_err();
        assert!(matches!(
            err,
            ThemeError::ModeConflict {
                requested: ThemeMode::Global,
                active: ThemeMode::Scoped
            }
        ));

        arena.release(lease);
        assert!(arena.is_empty());
        assert!(arena
            .claim(&ThemeScope::Global, "default", &tokens("#bbbbbb"))
            .is_ok());
        assert!(arena
            .claim(&ThemeScope::scoped("a"), "default", &tokens("#aaaaaa"))
            .is_err());
    }

    #[test]
    fn test_reapply_replaces_tokens() {
        let mut arena = ThemeArena::new();
        let scope = ThemeScope::scoped("a");
        let (lease, _) = arena.claim(&scope, "default", &tokens("#aaaaaa")).unwrap();
        let applied = arena.apply(lease, "night", &tokens("#000000")).unwrap();
        assert_eq!(applied.tokens.primary, "#000000");
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(&scope).unwrap().name, "night");
    }

    #[test]
    fn test_stale_lease_touches_nothing() {
        let mut arena = ThemeArena::new();
        let scope = ThemeScope::scoped("site");
        let (first, _) = arena.claim(&scope, "default", &tokens("#aaaaaa")).unwrap();
        assert!(arena.release(first).is_some());
        let (second, _) = arena.claim(&scope, "night", &tokens("#000000")).unwrap();

        assert!(arena.release(first).is_none());
        assert!(matches!(
            arena.apply(first, "default", &tokens("#aaaaaa")),
            Err(ThemeError::Released { .. })
        ));
        assert_eq!(arena.get(&scope).unwrap().name, "night");
        assert!(arena.release(second).is_some());
        assert!(arena.is_empty());
    }
}
