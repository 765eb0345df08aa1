//! Feature flags controlling optional pages and capabilities
//!
//! The key set is closed: every flag is declared in [`FeatureKey`] and stored
//! as one bit of a [`FeatureFlagSet`]. Sets are immutable values; `set`
//! returns a new set.

use bitflags::bitflags;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

use crate::template::PageKey;

/// Errors raised when writing flags by name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("unknown feature flag '{name}' (known flags: {known})")]
    UnknownKey { name: String, known: String },
}

/// Every feature flag the engine understands
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
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    AboutPage,
    ServicesPage,
    GalleryPage,
    TestimonialsPage,
    BlogPage,
    ContactPage,
    OnlineBooking,
    Newsletter,
    SocialLinks,
    LiveChat,
}

impl FeatureKey {
    /// The page this flag switches on, for page-controlling flags
    pub fn controlled_page(self) -> Option<PageKey> {
        match self {
            FeatureKey::AboutPage => Some(PageKey::About),
            FeatureKey::ServicesPage => Some(PageKey::Services),
            FeatureKey::GalleryPage => Some(PageKey::Gallery),
            FeatureKey::TestimonialsPage => Some(PageKey::Testimonials),
            FeatureKey::BlogPage => Some(PageKey::Blog),
            FeatureKey::ContactPage => Some(PageKey::Contact),
            FeatureKey::OnlineBooking
            | FeatureKey::Newsletter
            | FeatureKey::SocialLinks
            | FeatureKey::LiveChat => None,
        }
    }

    pub fn is_page_flag(self) -> bool {
        self.controlled_page().is_some()
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    fn bit(self) -> Flags {
        match self {
            FeatureKey::AboutPage => Flags::ABOUT_PAGE,
            FeatureKey::ServicesPage => Flags::SERVICES_PAGE,
            FeatureKey::GalleryPage => Flags::GALLERY_PAGE,
            FeatureKey::TestimonialsPage => Flags::TESTIMONIALS_PAGE,
            FeatureKey::BlogPage => Flags::BLOG_PAGE,
            FeatureKey::ContactPage => Flags::CONTACT_PAGE,
            FeatureKey::OnlineBooking => Flags::ONLINE_BOOKING,
            FeatureKey::Newsletter => Flags::NEWSLETTER,
            FeatureKey::SocialLinks => Flags::SOCIAL_LINKS,
            FeatureKey::LiveChat => Flags::LIVE_CHAT,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    struct Flags: u16 {
        const ABOUT_PAGE = 1 << 0;
        const SERVICES_PAGE = 1 << 1;
        const GALLERY_PAGE = 1 << 2;
        const TESTIMONIALS_PAGE = 1 << 3;
        const BLOG_PAGE = 1 << 4;
        const CONTACT_PAGE = 1 << 5;
        const ONLINE_BOOKING = 1 << 6;
        const NEWSLETTER = 1 << 7;
        const SOCIAL_LINKS = 1 << 8;
        const LIVE_CHAT = 1 << 9;

        const PAGES = Self::ABOUT_PAGE.bits()
            | Self::SERVICES_PAGE.bits()
            | Self::GALLERY_PAGE.bits()
            | Self::TESTIMONIALS_PAGE.bits()
            | Self::BLOG_PAGE.bits()
            | Self::CONTACT_PAGE.bits();
    }
}

/// Immutable map from the closed [`FeatureKey`] set to booleans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureFlagSet {
    flags: Flags,
}

/// Feature-derived counts handed to summary collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    pub enabled_pages: usize,
    pub enabled_features: usize,
}

impl FeatureFlagSet {
    /// A set with every flag off
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with every flag on
    pub fn all() -> Self {
        Self { flags: Flags::all() }
    }

    /// Read a flag
    pub fn get(&self, key: FeatureKey) -> bool {
        self.flags.contains(key.bit())
    }

    /// Read a flag by name; names outside the key set read as `false`
    pub fn get_by_name(&self, name: &str) -> bool {
        match name.trim().parse::<FeatureKey>() {
            Ok(key) => self.get(key),
            Err(_) => {
                tracing::debug!(flag = name, "unknown feature flag read as disabled");
                false
            }
        }
    }

    /// Return a new set with `key` switched to `enabled`
    #[must_use]
    pub fn set(&self, key: FeatureKey, enabled: bool) -> Self {
        let mut flags = self.flags;
        flags.set(key.bit(), enabled);
        Self { flags }
    }

    /// Return a new set with the named flag switched to `enabled`
    ///
    /// Names outside the key set are rejected.
    pub fn set_by_name(&self, name: &str, enabled: bool) -> Result<Self, FeatureError> {
        let key = name
            .trim()
            .parse::<FeatureKey>()
            .map_err(|_| FeatureError::UnknownKey {
                name: name.to_string(),
                known: FeatureKey::iter()
                    .map(FeatureKey::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        Ok(self.set(key, enabled))
    }

    /// Whether `page` is switched on; the home page always is
    pub fn page_enabled(&self, page: PageKey) -> bool {
        page.controlling_flag().map_or(true, |flag| self.get(flag))
    }

    /// Number of enabled pages: one per true page-controlling flag, plus home
    pub fn count_enabled_pages(&self) -> usize {
        (self.flags & Flags::PAGES).bits().count_ones() as usize + 1
    }

    /// Number of true flags of any kind
    pub fn count_enabled_features(&self) -> usize {
        self.flags.bits().count_ones() as usize
    }

    pub fn summary(&self) -> FeatureSummary {
        FeatureSummary {
            enabled_pages: self.count_enabled_pages(),
            enabled_features: self.count_enabled_features(),
        }
    }

    /// Enabled flags in declaration order
    pub fn enabled(&self) -> impl Iterator<Item = FeatureKey> + '_ {
        FeatureKey::iter().filter(|key| self.get(*key))
    }
}

impl FromIterator<(FeatureKey, bool)> for FeatureFlagSet {
    fn from_iter<I: IntoIterator<Item = (FeatureKey, bool)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, (key, enabled)| set.set(key, enabled))
    }
}
