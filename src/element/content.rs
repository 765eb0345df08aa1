//! Content shapes for editable elements and their sparse overrides

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::button::ButtonContent;
use super::error::{EditError, ValidationError};

/// Kind of an editable element
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Icon,
    Button,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A content record with a fixed set of string-addressable fields
pub trait EditableContent: Clone + PartialEq + fmt::Debug + Serialize {
    const KIND: ElementKind;

    /// Every field of the shape, by its wire name
    const FIELDS: &'static [&'static str];

    /// Read a field as a string
    fn field(&self, name: &str) -> Option<String>;

    /// Write a field from a string
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), EditError>;

    /// Check the record can be committed
    fn validate(&self) -> Result<(), ValidationError>;

    fn into_any(self) -> AnyContent;

    /// The shape's own name for `name`, if it is one of its fields
    fn canonical_field(name: &str) -> Option<&'static str> {
        Self::FIELDS.iter().copied().find(|field| *field == name)
    }
}

/// Sparse set of user-changed fields layered over default content
///
/// Keys always come from the content shape's field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override<C> {
    values: BTreeMap<&'static str, String>,
    _shape: PhantomData<fn() -> C>,
}

impl<C> Default for Override<C> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            _shape: PhantomData,
        }
    }
}

impl<C: EditableContent> Override<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an override from stored pairs, checking every key and value
    /// against the shape of `default`
    pub fn parse<'a, I>(default: &C, pairs: I) -> Result<Self, EditError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut scratch = default.clone();
        let mut values = BTreeMap::new();
        for (name, value) in pairs {
            let field = C::canonical_field(name)
                .ok_or_else(|| EditError::unknown_field(C::KIND.as_str(), name))?;
            scratch.set_field(field, value)?;
            values.insert(field, value.to_string());
        }
        Ok(Self {
            values,
            _shape: PhantomData,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// A copy of this override with one key replaced
    pub(crate) fn with_value(&self, field: &'static str, value: String) -> Self {
        let mut values = self.values.clone();
        values.insert(field, value);
        Self {
            values,
            _shape: PhantomData,
        }
    }

    /// Layer this override over `default`
    pub fn apply(&self, default: &C) -> C {
        let mut merged = default.clone();
        for (field, value) in &self.values {
            if let Err(err) = merged.set_field(field, value) {
                tracing::warn!(field = *field, error = %err, "override value skipped");
            }
        }
        merged
    }

    /// The override as a flat JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

/// Merge an element's default content with its override
pub fn merge<C: EditableContent>(default: &C, overrides: &Override<C>) -> C {
    overrides.apply(default)
}

/// Plain text content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl EditableContent for TextContent {
    const KIND: ElementKind = ElementKind::Text;
    const FIELDS: &'static [&'static str] = &["text"];

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "text" => Some(self.text.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), EditError> {
        match name {
            "text" => self.text = value.to_string(),
            _ => return Err(EditError::unknown_field(Self::KIND.as_str(), name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::blank("text"));
        }
        Ok(())
    }

    fn into_any(self) -> AnyContent {
        AnyContent::Text(self)
    }
}

/// Icons available to icon elements
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Star,
    Heart,
    Leaf,
    Utensils,
    Coffee,
    Camera,
    Palette,
    Stethoscope,
    Calendar,
    Clock,
    Phone,
    Mail,
    MapPin,
    Chat,
    Facebook,
    Instagram,
}

/// Glyph shown for icon ids outside the table
pub const PLACEHOLDER_GLYPH: &str = "\u{25A1}";

impl Icon {
    /// Look an icon up by id
    pub fn from_id(id: &str) -> Option<Self> {
        id.parse().ok()
    }

    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Star => "\u{2605}",
            Icon::Heart => "\u{2665}",
            Icon::Leaf => "\u{1F343}",
            Icon::Utensils => "\u{1F374}",
            Icon::Coffee => "\u{2615}",
            Icon::Camera => "\u{1F4F7}",
            Icon::Palette => "\u{1F3A8}",
            Icon::Stethoscope => "\u{1FA7A}",
            Icon::Calendar => "\u{1F4C5}",
            Icon::Clock => "\u{1F552}",
            Icon::Phone => "\u{260E}",
            Icon::Mail => "\u{2709}",
            Icon::MapPin => "\u{1F4CD}",
            Icon::Chat => "\u{1F4AC}",
            Icon::Facebook => "f",
            Icon::Instagram => "\u{25CE}",
        }
    }
}

/// Icon content, addressed by icon id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconContent {
    pub icon_id: String,
}

impl IconContent {
    pub fn new(icon: Icon) -> Self {
        Self {
            icon_id: icon.id().to_string(),
        }
    }

    pub fn icon(&self) -> Option<Icon> {
        Icon::from_id(&self.icon_id)
    }

    /// Glyph for the icon, or the placeholder for unknown ids
    pub fn glyph(&self) -> &'static str {
        self.icon().map_or(PLACEHOLDER_GLYPH, Icon::glyph)
    }
}

impl EditableContent for IconContent {
    const KIND: ElementKind = ElementKind::Icon;
    const FIELDS: &'static [&'static str] = &["iconId"];

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "iconId" => Some(self.icon_id.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), EditError> {
        match name {
            "iconId" => self.icon_id = value.trim().to_string(),
            _ => return Err(EditError::unknown_field(Self::KIND.as_str(), name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.icon_id.is_empty() {
            return Err(ValidationError::blank("iconId"));
        }
        if self.icon().is_none() {
            return Err(ValidationError::new(
                "iconId",
                format!("unknown icon '{}'", self.icon_id),
            ));
        }
        Ok(())
    }

    fn into_any(self) -> AnyContent {
        AnyContent::Icon(self)
    }
}

/// Content of any element kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyContent {
    Text(TextContent),
    Icon(IconContent),
    Button(ButtonContent),
}

impl AnyContent {
    pub fn kind(&self) -> ElementKind {
        match self {
            AnyContent::Text(_) => ElementKind::Text,
            AnyContent::Icon(_) => ElementKind::Icon,
            AnyContent::Button(_) => ElementKind::Button,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_override_merges_to_default() {
        let text = TextContent::new("Hello");
        assert_eq!(merge(&text, &Override::new()), text);

        let icon = IconContent::new(Icon::Leaf);
        assert_eq!(merge(&icon, &Override::new()), icon);

        let button = ButtonContent::new("Book");
        assert_eq!(merge(&button, &Override::new()), button);
    }

    #[test]
    fn test_override_replaces_only_its_keys() {
        let default = TextContent::new("Hello");
        let overrides = Override::<TextContent>::new().with_value("text", "Bonjour".to_string());
        assert_eq!(merge(&default, &overrides).text, "Bonjour");
        assert_eq!(default.text, "Hello");
    }

    #[test]
    fn test_parse_rejects_foreign_keys() {
        let default = TextContent::new("Hello");
        let err = Override::parse(&default, [("color", "red")]).unwrap_err();
        assert!(matches!(err, EditError::UnknownField { field, .. } if field == "color"));
    }

    #[test]
    fn test_parse_accepts_shape_keys() {
        let default = ButtonContent::new("Go");
        let overrides =
            Override::parse(&default, [("title", "Reserve"), ("padding", "8px 16px")]).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("title"), Some("Reserve"));
        assert_eq!(
            overrides.to_json(),
            serde_json::json!({"padding": "8px 16px", "title": "Reserve"})
        );
    }

    #[test]
    fn test_text_validation() {
        assert!(TextContent::new("ok").validate().is_ok());
        assert_eq!(
            TextContent::new("").validate(),
            Err(ValidationError::blank("text"))
        );
        assert!(TextContent::new(" \t\n").validate().is_err());
    }

    #[test]
    fn test_icon_lookup_and_fallback() {
        assert_eq!(Icon::from_id("map-pin"), Some(Icon::MapPin));
        assert_eq!(IconContent::new(Icon::Star).glyph(), "\u{2605}");

        let unknown = IconContent {
            icon_id: "unicorn".to_string(),
        };
        assert_eq!(unknown.glyph(), PLACEHOLDER_GLYPH);
        assert!(unknown.validate().is_err());
    }

    #[test]
    fn test_any_content_json_is_tagged() {
        let json = IconContent::new(Icon::Phone).into_any().to_json();
        assert_eq!(json, serde_json::json!({"kind": "icon", "iconId": "phone"}));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut text = TextContent::new("a");
        assert!(matches!(
            text.set_field("iconId", "star"),
            Err(EditError::UnknownField { kind: "text", .. })
        ));
    }
}
