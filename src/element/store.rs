//! All editable elements of one composition

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::button::ButtonContent;
use super::content::{
    merge, AnyContent, EditableContent, ElementKind, Icon, IconContent, Override, TextContent,
};
use super::controller::{EditableElement, ElementChange, RenderedElement};
use super::error::EditError;
use super::ElementId;
use crate::template::PageKey;

/// Declaration of an element a template's pages render
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSeed {
    pub id: ElementId,
    /// Page whose save carries this element's override
    pub page: PageKey,
    pub content: AnyContent,
}

impl ElementSeed {
    pub fn text(page: PageKey, id: &str, text: &str) -> Self {
        Self {
            id: id.into(),
            page,
            content: AnyContent::Text(TextContent::new(text)),
        }
    }

    pub fn icon(page: PageKey, id: &str, icon: Icon) -> Self {
        Self {
            id: id.into(),
            page,
            content: AnyContent::Icon(IconContent::new(icon)),
        }
    }

    pub fn button(page: PageKey, id: &str, button: ButtonContent) -> Self {
        Self {
            id: id.into(),
            page,
            content: AnyContent::Button(button),
        }
    }
}

/// An editable element of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum AnyElement {
    Text(EditableElement<TextContent>),
    Icon(EditableElement<IconContent>),
    Button(EditableElement<ButtonContent>),
}

macro_rules! each_kind {
    ($value:expr, $element:ident => $body:expr) => {
        match $value {
            AnyElement::Text($element) => $body,
            AnyElement::Icon($element) => $body,
            AnyElement::Button($element) => $body,
        }
    };
}

impl AnyElement {
    fn from_content(id: ElementId, content: AnyContent) -> Self {
        match content {
            AnyContent::Text(c) => AnyElement::Text(EditableElement::new(id, c)),
            AnyContent::Icon(c) => AnyElement::Icon(EditableElement::new(id, c)),
            AnyContent::Button(c) => AnyElement::Button(EditableElement::new(id, c)),
        }
    }

    pub fn id(&self) -> &ElementId {
        each_kind!(self, e => e.id())
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            AnyElement::Text(_) => ElementKind::Text,
            AnyElement::Icon(_) => ElementKind::Icon,
            AnyElement::Button(_) => ElementKind::Button,
        }
    }

    pub fn merged(&self) -> AnyContent {
        match self {
            AnyElement::Text(e) => AnyContent::Text(e.merged()),
            AnyElement::Icon(e) => AnyContent::Icon(e.merged()),
            AnyElement::Button(e) => AnyContent::Button(e.merged()),
        }
    }

    pub fn has_session(&self) -> bool {
        each_kind!(self, e => e.session().is_some())
    }

    pub fn has_override(&self) -> bool {
        each_kind!(self, e => !e.override_record().is_empty())
    }

    pub fn override_json(&self) -> Value {
        each_kind!(self, e => e.override_record().to_json())
    }

    pub fn open_session(&mut self) {
        each_kind!(self, e => {
            e.open_session();
        })
    }

    pub fn mutate_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        each_kind!(self, e => e.mutate_field(field, value))
    }

    pub fn commit(&mut self) -> Result<ElementChange, EditError> {
        each_kind!(self, e => e.commit())
    }

    pub fn cancel(&mut self) -> bool {
        each_kind!(self, e => e.cancel())
    }

    /// This element with `pairs` as its override, held to the same rules as
    /// a commit
    fn restored<'a, I>(&self, pairs: I) -> Result<Self, EditError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        match self {
            AnyElement::Text(e) => Ok(AnyElement::Text(restore_checked(e, pairs)?)),
            AnyElement::Icon(e) => Ok(AnyElement::Icon(restore_checked(e, pairs)?)),
            AnyElement::Button(e) => Ok(AnyElement::Button(restore_checked(e, pairs)?)),
        }
    }
}

fn restore_checked<'a, C, I>(
    element: &EditableElement<C>,
    pairs: I,
) -> Result<EditableElement<C>, EditError>
where
    C: EditableContent,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let overrides = Override::parse(element.default_content(), pairs)?;
    merge(element.default_content(), &overrides).validate()?;
    Ok(element.clone().with_override(overrides))
}

/// A restored element waiting to replace its current state
#[derive(Debug, Clone, PartialEq)]
pub struct StagedOverride {
    id: ElementId,
    element: AnyElement,
}

impl StagedOverride {
    pub fn id(&self) -> &ElementId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct StoredElement {
    page: PageKey,
    element: AnyElement,
}

/// Element state of one composition, keyed by element id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStore {
    elements: BTreeMap<ElementId, StoredElement>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create every seeded element with an empty override
    pub fn from_seeds(seeds: &[ElementSeed]) -> Self {
        let elements = seeds
            .iter()
            .map(|seed| {
                (
                    seed.id.clone(),
                    StoredElement {
                        page: seed.page,
                        element: AnyElement::from_content(seed.id.clone(), seed.content.clone()),
                    },
                )
            })
            .collect();
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AnyElement> {
        self.elements.get(id).map(|stored| &stored.element)
    }

    pub fn page_of(&self, id: &str) -> Option<PageKey> {
        self.elements.get(id).map(|stored| stored.page)
    }

    /// Ids of the elements saved with `page`
    pub fn ids_on(&self, page: PageKey) -> impl Iterator<Item = &ElementId> {
        self.elements
            .iter()
            .filter(move |(_, stored)| stored.page == page)
            .map(|(id, _)| id)
    }

    pub fn text(&self, id: &str, edit_mode: bool) -> Option<RenderedElement<TextContent>> {
        match self.get(id)? {
            AnyElement::Text(e) => Some(e.render(edit_mode)),
            _ => None,
        }
    }

    pub fn icon(&self, id: &str, edit_mode: bool) -> Option<RenderedElement<IconContent>> {
        match self.get(id)? {
            AnyElement::Icon(e) => Some(e.render(edit_mode)),
            _ => None,
        }
    }

    pub fn button(&self, id: &str, edit_mode: bool) -> Option<RenderedElement<ButtonContent>> {
        match self.get(id)? {
            AnyElement::Button(e) => Some(e.render(edit_mode)),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut AnyElement, EditError> {
        self.elements
            .get_mut(id)
            .map(|stored| &mut stored.element)
            .ok_or_else(|| EditError::ElementNotFound {
                element_id: id.into(),
            })
    }

    pub fn open_session(&mut self, id: &str) -> Result<(), EditError> {
        self.element_mut(id)?.open_session();
        Ok(())
    }

    pub fn mutate_field(&mut self, id: &str, field: &str, value: &str) -> Result<(), EditError> {
        self.element_mut(id)?.mutate_field(field, value)
    }

    pub fn commit(&mut self, id: &str) -> Result<ElementChange, EditError> {
        self.element_mut(id)?.commit()
    }

    /// Cancel the session on `id`; `Ok(false)` when none was open
    pub fn cancel(&mut self, id: &str) -> Result<bool, EditError> {
        Ok(self.element_mut(id)?.cancel())
    }

    /// Cancel every open session, returning how many were open
    pub fn cancel_all(&mut self) -> usize {
        self.elements
            .values_mut()
            .map(|stored| stored.element.cancel())
            .filter(|cancelled| *cancelled)
            .count()
    }

    /// Load a stored override for `id`, replacing the current one
    pub fn restore_override<'a, I>(&mut self, id: &str, pairs: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let staged = self.stage_override(id, pairs)?;
        self.apply_staged([staged]);
        Ok(())
    }

    /// Check a stored override for `id` without touching the store
    pub fn stage_override<'a, I>(&self, id: &str, pairs: I) -> Result<StagedOverride, EditError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let stored = self
            .elements
            .get(id)
            .ok_or_else(|| EditError::ElementNotFound {
                element_id: id.into(),
            })?;
        Ok(StagedOverride {
            id: id.into(),
            element: stored.element.restored(pairs)?,
        })
    }

    /// Swap in staged overrides; later entries for the same id win
    pub fn apply_staged<I>(&mut self, staged: I)
    where
        I: IntoIterator<Item = StagedOverride>,
    {
        for StagedOverride { id, element } in staged {
            if let Some(stored) = self.elements.get_mut(&id) {
                stored.element = element;
            }
        }
    }

    /// Content patch for a page-level save: `{element id: override}` for
    /// every overridden element attributed to `page`
    pub fn page_patch(&self, page: PageKey) -> Value {
        let patch: Map<String, Value> = self
            .elements
            .iter()
            .filter(|(_, stored)| stored.page == page && stored.element.has_override())
            .map(|(id, stored)| (id.to_string(), stored.element.override_json()))
            .collect();
        Value::Object(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> ElementStore {
        ElementStore::from_seeds(&[
            ElementSeed::text(PageKey::Home, "home.title", "Welcome"),
            ElementSeed::icon(PageKey::Home, "home.icon", Icon::Leaf),
            ElementSeed::button(PageKey::Contact, "contact.submit", ButtonContent::new("Send")),
        ])
    }

    #[test]
    fn test_seeded_elements_render_defaults() {
        let store = store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.text("home.title", false).unwrap().content.text, "Welcome");
        assert_eq!(store.icon("home.icon", false).unwrap().content.icon(), Some(Icon::Leaf));
        assert!(store.button("home.title", false).is_none());
        assert!(store.text("missing", false).is_none());
    }

    #[test]
    fn test_edit_through_store() {
        let mut store = store();
        store.open_session("home.title").unwrap();
        store.mutate_field("home.title", "text", "Hello").unwrap();
        let change = store.commit("home.title").unwrap();
        assert_eq!(change.content, AnyContent::Text(TextContent::new("Hello")));
        assert_eq!(store.text("home.title", true).unwrap().content.text, "Hello");
    }

    #[test]
    fn test_unknown_element() {
        let mut store = store();
        assert!(matches!(
            store.open_session("nope"),
            Err(EditError::ElementNotFound { .. })
        ));
    }

    #[test]
    fn test_elements_are_independent() {
        let mut store = store();
        store.open_session("home.title").unwrap();
        store.open_session("home.icon").unwrap();
        store.mutate_field("home.icon", "iconId", "coffee").unwrap();
        store.cancel("home.title").unwrap();
        store.commit("home.icon").unwrap();
        assert!(!store.get("home.title").unwrap().has_override());
        assert!(store.get("home.icon").unwrap().has_override());
    }

    #[test]
    fn test_cancel_all() {
        let mut store = store();
        store.open_session("home.title").unwrap();
        store.open_session("contact.submit").unwrap();
        assert_eq!(store.cancel_all(), 2);
        assert_eq!(store.cancel_all(), 0);
    }

    #[test]
    fn test_page_patch_holds_only_overrides_of_that_page() {
        let mut store = store();
        store.open_session("contact.submit").unwrap();
        store.mutate_field("contact.submit", "borderRadius", "0").unwrap();
        store.commit("contact.submit").unwrap();
        store.open_session("home.title").unwrap();
        store.mutate_field("home.title", "text", "Hi").unwrap();
        store.commit("home.title").unwrap();

        assert_eq!(
            store.page_patch(PageKey::Contact),
            serde_json::json!({"contact.submit": {"borderRadius": "0"}})
        );
        assert_eq!(
            store.page_patch(PageKey::Home),
            serde_json::json!({"home.title": {"text": "Hi"}})
        );
        assert_eq!(store.page_patch(PageKey::Blog), serde_json::json!({}));
    }

    #[test]
    fn test_restore_override_checks_shape() {
        let mut store = store();
        store
            .restore_override("contact.submit", [("title", "Submit")])
            .unwrap();
        assert_eq!(
            store.button("contact.submit", false).unwrap().content.title,
            "Submit"
        );
        assert!(store
            .restore_override("home.title", [("iconId", "star")])
            .is_err());
    }

    #[test]
    fn test_restored_content_is_validated() {
        let mut store = store();
        assert!(matches!(
            store.restore_override("home.title", [("text", "   ")]),
            Err(EditError::Validation(_))
        ));
        assert!(matches!(
            store.restore_override("home.icon", [("iconId", "rocket")]),
            Err(EditError::Validation(_))
        ));
        assert_eq!(store.text("home.title", false).unwrap().content.text, "Welcome");
        assert!(!store.get("home.icon").unwrap().has_override());
    }

    #[test]
    fn test_staging_leaves_store_untouched() {
        let mut store = store();
        let staged = store.stage_override("home.title", [("text", "Hello")]).unwrap();
        assert_eq!(staged.id().as_str(), "home.title");
        assert!(!store.get("home.title").unwrap().has_override());

        store.apply_staged([staged]);
        assert_eq!(store.text("home.title", false).unwrap().content.text, "Hello");
    }
}
