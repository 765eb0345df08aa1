//! Site configuration files
//!
//! A site file is TOML:
//!
//! ```toml
//! template = "bistro"
//! theme = "olive"
//! page = "services"
//! edit = true
//! device = "mobile"
//!
//! [features]
//! services_page = true
//! online_booking = true
//!
//! [website]
//! businessName = "Chez Nous"
//!
//! [overrides."home.hero.title"]
//! text = "Welcome to Chez Nous"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::features::{FeatureError, FeatureFlagSet};
use crate::orchestrator::CompositionProps;
use crate::responsive::{Breakpoint, Viewport};
use crate::service::WebsiteData;

/// Errors that can occur when loading a site configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no template selected")]
    MissingTemplate,

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("invalid website data: {0}")]
    Website(#[from] serde_json::Error),
}

/// Stored overrides: element id to `{field: value}`
pub type OverrideTable = BTreeMap<String, BTreeMap<String, String>>;

/// Contents of a site configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub template: Option<String>,
    pub theme: Option<String>,
    pub page: Option<String>,
    #[serde(default)]
    pub edit: bool,
    /// Device preview; wins over `width`
    pub device: Option<Breakpoint>,
    /// Container width in pixels
    pub width: Option<u32>,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    /// Host data handed to page renderers
    #[serde(default)]
    pub website: toml::Table,
    #[serde(default)]
    pub overrides: OverrideTable,
}

impl SiteConfig {
    /// Load a configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Viewport described by `device` and `width`
    pub fn viewport(&self) -> Viewport {
        match (self.device, self.width) {
            (Some(device), _) => Viewport::Override(device),
            (None, Some(width)) => Viewport::Measured(width),
            (None, None) => Viewport::default(),
        }
    }

    /// Feature flags named in `[features]`; unknown names are rejected
    pub fn feature_flags(&self) -> Result<FeatureFlagSet, ConfigError> {
        let mut flags = FeatureFlagSet::new();
        for (name, enabled) in &self.features {
            flags = flags.set_by_name(name, *enabled)?;
        }
        Ok(flags)
    }

    /// Turn the file into composition props
    pub fn into_props(self) -> Result<CompositionProps, ConfigError> {
        let features = self.feature_flags()?;
        let viewport = self.viewport();
        let website = WebsiteData::new(serde_json::to_value(&self.website)?);
        let template = self.template.ok_or(ConfigError::MissingTemplate)?;

        let mut props = CompositionProps::new(template)
            .with_features(features)
            .with_edit_mode(self.edit)
            .with_viewport(viewport)
            .with_website(website)
            .with_overrides(self.overrides);
        if let Some(theme) = self.theme {
            props = props.with_theme(theme);
        }
        if let Some(page) = self.page {
            props = props.with_page(page);
        }
        Ok(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureKey;
    use pretty_assertions::assert_eq;

    const SITE: &str = r#"
template = "bistro"
theme = "olive"
page = "services"
edit = true
width = 600

[features]
services_page = true
newsletter = true

[website]
businessName = "Chez Nous"

[overrides."home.hero.title"]
text = "Welcome"
"#;

    #[test]
    fn test_parse_site_config() {
        let config = SiteConfig::parse(SITE).expect("Should parse");
        assert_eq!(config.template.as_deref(), Some("bistro"));
        assert_eq!(config.viewport(), Viewport::Measured(600));
        assert_eq!(config.overrides["home.hero.title"]["text"], "Welcome");

        let flags = config.feature_flags().unwrap();
        assert!(flags.get(FeatureKey::ServicesPage));
        assert!(flags.get(FeatureKey::Newsletter));
        assert!(!flags.get(FeatureKey::BlogPage));
    }

    #[test]
    fn test_into_props() {
        let props = SiteConfig::parse(SITE).unwrap().into_props().unwrap();
        assert_eq!(props.template_id, "bistro");
        assert_eq!(props.theme.as_deref(), Some("olive"));
        assert_eq!(props.page, "services");
        assert!(props.edit_mode);
        assert_eq!(props.website.get_str("businessName"), Some("Chez Nous"));
        assert_eq!(props.overrides.len(), 1);
    }

    #[test]
    fn test_device_wins_over_width() {
        let config = SiteConfig::parse("device = \"tablet\"\nwidth = 1400").unwrap();
        assert_eq!(config.viewport(), Viewport::Override(Breakpoint::Tablet));
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let config = SiteConfig::parse("template = \"bistro\"\n[features]\nteleport = true").unwrap();
        assert!(matches!(
            config.into_props(),
            Err(ConfigError::Feature(FeatureError::UnknownKey { .. }))
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            SiteConfig::parse("colour = \"red\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_template() {
        assert!(matches!(
            SiteConfig::default().into_props(),
            Err(ConfigError::MissingTemplate)
        ));
    }
}
