//! Override + session protocol shared by every element kind

use serde::Serialize;

use super::content::{merge, AnyContent, EditableContent, ElementKind, Override};
use super::error::{EditError, ValidationError};
use super::session::EditSession;
use super::ElementId;

/// Merged content ready to draw, plus the edit affordance state
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement<C> {
    pub id: ElementId,
    pub content: C,
    /// Whether the interactive edit affordance is shown
    pub editable: bool,
    /// Whether a session is open on the element
    pub editing: bool,
    /// Inline message from the last rejected commit
    pub error: Option<ValidationError>,
}

/// Notification emitted by a successful commit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementChange {
    pub element_id: ElementId,
    /// Full merged content after the commit
    pub content: AnyContent,
}

impl ElementChange {
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }
}

/// One editable element: default content, sparse override, optional session
#[derive(Debug, Clone, PartialEq)]
pub struct EditableElement<C> {
    id: ElementId,
    default: C,
    overrides: Override<C>,
    session: Option<EditSession<C>>,
}

impl<C: EditableContent> EditableElement<C> {
    pub fn new(id: impl Into<ElementId>, default: C) -> Self {
        Self {
            id: id.into(),
            default,
            overrides: Override::new(),
            session: None,
        }
    }

    /// Start from a previously stored override
    pub fn with_override(mut self, overrides: Override<C>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn default_content(&self) -> &C {
        &self.default
    }

    pub fn override_record(&self) -> &Override<C> {
        &self.overrides
    }

    pub fn session(&self) -> Option<&EditSession<C>> {
        self.session.as_ref()
    }

    pub fn merged(&self) -> C {
        merge(&self.default, &self.overrides)
    }

    /// Merged content with the affordance shown only in edit mode
    pub fn render(&self, edit_mode: bool) -> RenderedElement<C> {
        RenderedElement {
            id: self.id.clone(),
            content: self.merged(),
            editable: edit_mode,
            editing: edit_mode && self.session.is_some(),
            error: if edit_mode {
                self.session.as_ref().and_then(|s| s.error().cloned())
            } else {
                None
            },
        }
    }

    /// Open a session on the current merged content
    ///
    /// An already open session is replaced; its draft is discarded.
    pub fn open_session(&mut self) -> &EditSession<C> {
        if self.session.is_some() {
            tracing::debug!(element = %self.id, "replacing open edit session");
        }
        self.session.insert(EditSession::open(self.id.clone(), &self.merged()))
    }

    pub fn mutate_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        self.session
            .as_mut()
            .ok_or_else(|| EditError::NoSession {
                element_id: self.id.clone(),
            })?
            .mutate_field(field, value)
    }

    /// Fold the dirty draft fields into the override and close the session
    ///
    /// A draft failing validation is kept open with the error attached.
    pub fn commit(&mut self) -> Result<ElementChange, EditError> {
        let session = self.session.as_mut().ok_or_else(|| EditError::NoSession {
            element_id: self.id.clone(),
        })?;
        session.validate()?;

        let Some(session) = self.session.take() else {
            return Err(EditError::NoSession {
                element_id: self.id.clone(),
            });
        };
        let (draft, dirty) = session.into_parts();
        let mut next = self.overrides.clone();
        for field in dirty.iter() {
            if let Some(value) = draft.field(field) {
                next = next.with_value(field, value);
            }
        }
        self.overrides = next;

        tracing::info!(
            element = %self.id,
            kind = %C::KIND,
            fields = dirty.len(),
            "element committed"
        );
        Ok(ElementChange {
            element_id: self.id.clone(),
            content: self.merged().into_any(),
        })
    }

    /// Drop the open session, if any; the override is untouched
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }
}
