//! Button content and background resolution

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::content::{AnyContent, EditableContent, ElementKind};
use super::error::{EditError, ValidationError};

/// How a button paints its background
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackgroundType {
    Solid,
    Linear,
    Radial,
    /// Any other stored value; rendered like `Solid`
    Other(String),
}

impl BackgroundType {
    /// Parse only the three supported types
    pub fn parse_supported(value: &str) -> Option<Self> {
        match value.parse::<BackgroundType>() {
            Ok(BackgroundType::Other(_)) | Err(_) => None,
            Ok(known) => Some(known),
        }
    }
}

impl FromStr for BackgroundType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "solid" => BackgroundType::Solid,
            "linear" => BackgroundType::Linear,
            "radial" => BackgroundType::Radial,
            other => BackgroundType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for BackgroundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundType::Solid => write!(f, "solid"),
            BackgroundType::Linear => write!(f, "linear"),
            BackgroundType::Radial => write!(f, "radial"),
            BackgroundType::Other(other) => write!(f, "{}", other),
        }
    }
}

impl From<String> for BackgroundType {
    fn from(value: String) -> Self {
        match value.parse::<BackgroundType>() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<BackgroundType> for String {
    fn from(value: BackgroundType) -> Self {
        value.to_string()
    }
}

/// Call-to-action button content
///
/// Sizes and colors are CSS values kept as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonContent {
    pub title: String,
    pub font_size: String,
    pub text_color: String,
    pub font_weight: String,
    pub font_family: String,
    pub background_type: BackgroundType,
    pub background_color: String,
    pub gradient_color1: String,
    pub gradient_color2: String,
    pub gradient_direction: String,
    pub padding: String,
    pub border_radius: String,
    pub width: String,
    pub height: String,
}

impl Default for ButtonContent {
    fn default() -> Self {
        Self {
            title: "Learn more".to_string(),
            font_size: "16px".to_string(),
            text_color: "#ffffff".to_string(),
            font_weight: "600".to_string(),
            font_family: "inherit".to_string(),
            background_type: BackgroundType::Solid,
            background_color: "var(--color-primary)".to_string(),
            gradient_color1: "var(--color-primary)".to_string(),
            gradient_color2: "var(--color-accent)".to_string(),
            gradient_direction: "90deg".to_string(),
            padding: "12px 24px".to_string(),
            border_radius: "6px".to_string(),
            width: "auto".to_string(),
            height: "auto".to_string(),
        }
    }
}

impl ButtonContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Switch to a linear gradient
    pub fn with_linear(
        mut self,
        direction: impl Into<String>,
        color1: impl Into<String>,
        color2: impl Into<String>,
    ) -> Self {
        self.background_type = BackgroundType::Linear;
        self.gradient_direction = direction.into();
        self.gradient_color1 = color1.into();
        self.gradient_color2 = color2.into();
        self
    }

    /// Switch to a radial gradient
    pub fn with_radial(mut self, color1: impl Into<String>, color2: impl Into<String>) -> Self {
        self.background_type = BackgroundType::Radial;
        self.gradient_color1 = color1.into();
        self.gradient_color2 = color2.into();
        self
    }

    /// Switch to a solid background
    pub fn with_solid(mut self, color: impl Into<String>) -> Self {
        self.background_type = BackgroundType::Solid;
        self.background_color = color.into();
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    pub fn with_border_radius(mut self, radius: impl Into<String>) -> Self {
        self.border_radius = radius.into();
        self
    }

    /// CSS `background` value
    ///
    /// Unknown background types fall back to the solid background color.
    pub fn background(&self) -> String {
        match &self.background_type {
            BackgroundType::Solid => self.background_color.clone(),
            BackgroundType::Linear => format!(
                "linear-gradient({}, {}, {})",
                self.gradient_direction, self.gradient_color1, self.gradient_color2
            ),
            BackgroundType::Radial => format!(
                "radial-gradient({}, {})",
                self.gradient_color1, self.gradient_color2
            ),
            BackgroundType::Other(_) => self.background_color.clone(),
        }
    }

    /// Inline `style` attribute value for the rendered button
    pub fn inline_style(&self) -> String {
        [
            ("background", self.background()),
            ("color", self.text_color.clone()),
            ("font-size", self.font_size.clone()),
            ("font-weight", self.font_weight.clone()),
            ("font-family", self.font_family.clone()),
            ("padding", self.padding.clone()),
            ("border-radius", self.border_radius.clone()),
            ("width", self.width.clone()),
            ("height", self.height.clone()),
        ]
        .iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ")
    }
}

impl EditableContent for ButtonContent {
    const KIND: ElementKind = ElementKind::Button;
    const FIELDS: &'static [&'static str] = &[
        "title",
        "fontSize",
        "textColor",
        "fontWeight",
        "fontFamily",
        "backgroundType",
        "backgroundColor",
        "gradientColor1",
        "gradientColor2",
        "gradientDirection",
        "padding",
        "borderRadius",
        "width",
        "height",
    ];

    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "title" => &self.title,
            "fontSize" => &self.font_size,
            "textColor" => &self.text_color,
            "fontWeight" => &self.font_weight,
            "fontFamily" => &self.font_family,
            "backgroundType" => return Some(self.background_type.to_string()),
            "backgroundColor" => &self.background_color,
            "gradientColor1" => &self.gradient_color1,
            "gradientColor2" => &self.gradient_color2,
            "gradientDirection" => &self.gradient_direction,
            "padding" => &self.padding,
            "borderRadius" => &self.border_radius,
            "width" => &self.width,
            "height" => &self.height,
            _ => return None,
        };
        Some(value.clone())
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), EditError> {
        let slot = match name {
            "title" => &mut self.title,
            "fontSize" => &mut self.font_size,
            "textColor" => &mut self.text_color,
            "fontWeight" => &mut self.font_weight,
            "fontFamily" => &mut self.font_family,
            "backgroundType" => {
                self.background_type =
                    BackgroundType::parse_supported(value).ok_or_else(|| {
                        EditError::invalid_value(
                            "backgroundType",
                            value,
                            "expected solid, linear or radial",
                        )
                    })?;
                return Ok(());
            }
            "backgroundColor" => &mut self.background_color,
            "gradientColor1" => &mut self.gradient_color1,
            "gradientColor2" => &mut self.gradient_color2,
            "gradientDirection" => &mut self.gradient_direction,
            "padding" => &mut self.padding,
            "borderRadius" => &mut self.border_radius,
            "width" => &mut self.width,
            "height" => &mut self.height,
            _ => return Err(EditError::unknown_field(Self::KIND.as_str(), name)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::blank("title"));
        }
        Ok(())
    }

    fn into_any(self) -> AnyContent {
        AnyContent::Button(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_background() {
        let button = ButtonContent::new("Go").with_linear("45deg", "#111", "#222");
        assert_eq!(button.background(), "linear-gradient(45deg, #111, #222)");
    }

    #[test]
    fn test_solid_background() {
        let button = ButtonContent::new("Go").with_solid("#333");
        assert_eq!(button.background(), "#333");
    }

    #[test]
    fn test_radial_background() {
        let button = ButtonContent::new("Go").with_radial("#111", "#222");
        assert_eq!(button.background(), "radial-gradient(#111, #222)");
    }

    #[test]
    fn test_unknown_background_falls_back_to_color() {
        let mut button = ButtonContent::new("Go").with_linear("45deg", "#111", "#222");
        button.background_type = BackgroundType::Other("conic".to_string());
        button.background_color = "#444".to_string();
        assert_eq!(button.background(), "#444");
    }

    #[test]
    fn test_unknown_background_from_stored_json() {
        let mut json = serde_json::to_value(ButtonContent::new("Go")).unwrap();
        json["backgroundType"] = serde_json::json!("pattern");
        json["backgroundColor"] = serde_json::json!("#555");
        let button: ButtonContent = serde_json::from_value(json).unwrap();
        assert_eq!(
            button.background_type,
            BackgroundType::Other("pattern".to_string())
        );
        assert_eq!(button.background(), "#555");
    }

    #[test]
    fn test_set_background_type_is_strict() {
        let mut button = ButtonContent::new("Go");
        assert!(button.set_field("backgroundType", "radial").is_ok());
        assert_eq!(button.background_type, BackgroundType::Radial);
        assert!(matches!(
            button.set_field("backgroundType", "conic"),
            Err(EditError::InvalidValue { field: "backgroundType", .. })
        ));
        assert_eq!(button.background_type, BackgroundType::Radial);
    }

    #[test]
    fn test_every_field_readable_and_writable() {
        let mut button = ButtonContent::new("Go");
        for field in ButtonContent::FIELDS {
            assert!(button.field(field).is_some(), "{field} unreadable");
            let value = if *field == "backgroundType" {
                "linear"
            } else {
                "x"
            };
            button.set_field(field, value).unwrap();
            assert_eq!(button.field(field).as_deref(), Some(value));
        }
    }

    #[test]
    fn test_inline_style() {
        let style = ButtonContent::new("Go").with_solid("#333").inline_style();
        assert!(style.starts_with("background: #333; color: #ffffff"));
        assert!(style.contains("border-radius: 6px"));
    }

    #[test]
    fn test_blank_title_invalid() {
        assert_eq!(
            ButtonContent::new("  ").validate(),
            Err(ValidationError::blank("title"))
        );
    }
}
