//! Edit sessions: a draft of one element plus the fields touched so far

use std::collections::BTreeSet;
use std::sync::Arc;

use super::content::EditableContent;
use super::error::{EditError, ValidationError};
use super::ElementId;

/// Copy-on-write set of field names changed during a session
///
/// Clones share storage until one side is modified, so a snapshot handed out
/// never observes later mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyFields(Arc<BTreeSet<&'static str>>);

impl DirtyFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: &'static str) {
        Arc::make_mut(&mut self.0).insert(field);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

/// An open edit of one element
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession<C> {
    element_id: ElementId,
    draft: C,
    dirty: DirtyFields,
    error: Option<ValidationError>,
}

impl<C: EditableContent> EditSession<C> {
    /// Open a session whose draft is a copy of `merged`
    pub fn open(element_id: ElementId, merged: &C) -> Self {
        Self {
            element_id,
            draft: merged.clone(),
            dirty: DirtyFields::new(),
            error: None,
        }
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    pub fn draft(&self) -> &C {
        &self.draft
    }

    pub fn dirty(&self) -> &DirtyFields {
        &self.dirty
    }

    /// Validation error from the last rejected commit
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Write one draft field and mark it dirty
    ///
    /// Rejected values leave both the draft and the dirty set untouched.
    pub fn mutate_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        let field = C::canonical_field(field)
            .ok_or_else(|| EditError::unknown_field(C::KIND.as_str(), field))?;
        self.draft.set_field(field, value)?;
        self.dirty.insert(field);
        self.error = None;
        Ok(())
    }

    pub(crate) fn validate(&mut self) -> Result<(), ValidationError> {
        let result = self.draft.validate();
        self.error = result.as_ref().err().cloned();
        result
    }

    pub(crate) fn into_parts(self) -> (C, DirtyFields) {
        (self.draft, self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ButtonContent, TextContent};

    #[test]
    fn test_open_copies_merged_content() {
        let merged = TextContent::new("Welcome");
        let session = EditSession::open(ElementId::from("hero"), &merged);
        assert_eq!(session.draft(), &merged);
        assert!(session.dirty().is_empty());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_mutate_marks_only_that_field() {
        let mut session = EditSession::open(ElementId::from("cta"), &ButtonContent::new("Go"));
        session.mutate_field("textColor", "#000").unwrap();
        session.mutate_field("title", "Book").unwrap();
        session.mutate_field("title", "Book now").unwrap();

        assert_eq!(
            session.dirty().iter().collect::<Vec<_>>(),
            vec!["textColor", "title"]
        );
        assert_eq!(session.draft().title, "Book now");
        assert_eq!(session.draft().padding, ButtonContent::default().padding);
    }

    #[test]
    fn test_rejected_mutation_leaves_session_untouched() {
        let mut session = EditSession::open(ElementId::from("cta"), &ButtonContent::new("Go"));
        assert!(session.mutate_field("shadow", "1px").is_err());
        assert!(session.mutate_field("backgroundType", "conic").is_err());
        assert!(session.dirty().is_empty());
        assert_eq!(session.draft(), &ButtonContent::new("Go"));
    }

    #[test]
    fn test_dirty_snapshot_is_copy_on_write() {
        let mut dirty = DirtyFields::new();
        dirty.insert("title");
        let snapshot = dirty.clone();
        dirty.insert("padding");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(dirty.len(), 2);
    }

    #[test]
    fn test_validate_records_error() {
        let mut session = EditSession::open(ElementId::from("t"), &TextContent::new("x"));
        session.mutate_field("text", "   ").unwrap();
        assert!(session.validate().is_err());
        assert_eq!(session.error(), Some(&ValidationError::blank("text")));
        session.mutate_field("text", "y").unwrap();
        assert!(session.error().is_none());
    }
}
