//! Error types for element editing

use thiserror::Error;

use super::ElementId;

/// A draft that cannot be committed as-is
///
/// Kept on the open session so edit mode can show it next to the element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Error for a required field left blank
    pub fn blank(field: &'static str) -> Self {
        Self::new(field, "must not be empty")
    }
}

/// Errors that can occur while editing elements
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("element not found: {element_id}")]
    ElementNotFound { element_id: ElementId },

    #[error("no edit session open on element {element_id}")]
    NoSession { element_id: ElementId },

    #[error("edit mode is off; cannot edit element {element_id}")]
    EditModeDisabled { element_id: ElementId },

    #[error("unknown field '{field}' for {kind} element")]
    UnknownField { kind: &'static str, field: String },

    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl EditError {
    pub fn unknown_field(kind: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            kind,
            field: field.into(),
        }
    }

    pub fn invalid_value(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Validation errors leave the session open; everything else is a misuse
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::blank("text");
        assert_eq!(err.to_string(), "text: must not be empty");
    }

    #[test]
    fn test_edit_error_display() {
        let err = EditError::unknown_field("button", "shadow");
        assert!(err.to_string().contains("shadow"));
        assert!(!err.is_validation());
        assert!(EditError::from(ValidationError::blank("title")).is_validation());
    }
}
