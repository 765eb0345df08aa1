//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::element::EditError;
use crate::features::FeatureError;
use crate::service::ServiceError;
use crate::template::TemplateError;
use crate::theme::ThemeError;

/// Any error the composition engine reports
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CompositionError {
    /// Whether the error names a template or theme that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CompositionError::Template(TemplateError::NotFound { .. })
                | CompositionError::Theme(ThemeError::NotFound { .. })
        )
    }

    /// Whether the error is a rejected commit the user can fix inline
    pub fn is_validation(&self) -> bool {
        matches!(self, CompositionError::Edit(error) if error.is_validation())
    }
}
