//! Editable elements and the override/edit-session protocol
//!
//! Every element has default content supplied by its template and a sparse
//! override holding only the fields a user changed. Editing goes through a
//! session:
//!
//! ```text
//! open_session -> mutate_field* -> commit   (override updated for dirty fields)
//!                               -> cancel   (draft discarded)
//! ```
//!
//! # Example
//!
//! ```rust
//! use site_composer::element::{EditableElement, TextContent};
//!
//! let mut title = EditableElement::new("home.title", TextContent::new("Welcome"));
//! title.open_session();
//! title.mutate_field("text", "Bienvenue").unwrap();
//! let change = title.commit().unwrap();
//!
//! assert_eq!(title.merged().text, "Bienvenue");
//! assert_eq!(change.element_id.as_str(), "home.title");
//! ```

mod button;
mod content;
mod controller;
mod error;
mod session;
mod store;

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use button::{BackgroundType, ButtonContent};
pub use content::{
    merge, AnyContent, EditableContent, ElementKind, Icon, IconContent, Override, TextContent,
    PLACEHOLDER_GLYPH,
};
pub use controller::{EditableElement, ElementChange, RenderedElement};
pub use error::{EditError, ValidationError};
pub use session::{DirtyFields, EditSession};
pub use store::{AnyElement, ElementSeed, ElementStore, StagedOverride};

/// Identifier of an editable element within a composition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
