//! Page keys and page descriptors

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::features::FeatureKey;

/// The closed set of page kinds a template can offer
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum PageKey {
    Home,
    About,
    Services,
    Gallery,
    Testimonials,
    Blog,
    Contact,
}

impl PageKey {
    /// The page every template must declare and every dispatch falls back to
    pub const DEFAULT: PageKey = PageKey::Home;

    /// Parse a host-supplied page key; `None` for anything outside the set
    pub fn parse(key: &str) -> Option<Self> {
        key.trim().parse().ok()
    }

    /// The feature flag that switches this page on, if any
    ///
    /// The home page is always present and has no controlling flag.
    pub fn controlling_flag(self) -> Option<FeatureKey> {
        match self {
            PageKey::Home => None,
            PageKey::About => Some(FeatureKey::AboutPage),
            PageKey::Services => Some(FeatureKey::ServicesPage),
            PageKey::Gallery => Some(FeatureKey::GalleryPage),
            PageKey::Testimonials => Some(FeatureKey::TestimonialsPage),
            PageKey::Blog => Some(FeatureKey::BlogPage),
            PageKey::Contact => Some(FeatureKey::ContactPage),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A page a template offers: stable id, display name, and kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Identifier used when talking to the website data service
    pub id: String,
    /// Name shown in navigation
    pub name: String,
    pub key: PageKey,
}

impl PageInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, key: PageKey) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_known_keys() {
        assert_eq!(PageKey::parse("home"), Some(PageKey::Home));
        assert_eq!(PageKey::parse("Testimonials"), Some(PageKey::Testimonials));
        assert_eq!(PageKey::parse("  contact "), Some(PageKey::Contact));
    }

    #[test]
    fn test_parse_unknown_key() {
        assert_eq!(PageKey::parse("pricing"), None);
        assert_eq!(PageKey::parse(""), None);
    }

    #[test]
    fn test_every_page_but_home_has_a_flag() {
        for key in PageKey::iter() {
            assert_eq!(key.controlling_flag().is_none(), key == PageKey::Home);
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for key in PageKey::iter() {
            assert_eq!(PageKey::parse(&key.to_string()), Some(key));
        }
    }
}
