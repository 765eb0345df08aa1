//! Template registry for storing and retrieving template definitions

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;

use crate::dispatch::PageTable;
use crate::element::{ElementId, ElementSeed};
use crate::features::FeatureFlagSet;
use crate::theme::{ThemeSet, DEFAULT_THEME};

use super::catalog;
use super::page::{PageInfo, PageKey};

/// Errors that can occur during template operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Template not found in registry
    #[error("template not found: {template_id}")]
    NotFound { template_id: String },

    /// Duplicate template definition
    #[error("duplicate template definition: {template_id}")]
    Duplicate { template_id: String },

    #[error("template {template_id} does not offer the home page")]
    MissingDefaultPage { template_id: String },

    #[error("template {template_id} lists page {page} more than once")]
    DuplicatePage { template_id: String, page: PageKey },

    /// Edit or display table keyed differently from the page list
    #[error("{mode} page table of template {template_id} does not match its pages at {page}")]
    TableMismatch {
        template_id: String,
        mode: &'static str,
        page: PageKey,
    },

    #[error("template {template_id} has no 'default' theme")]
    MissingDefaultTheme { template_id: String },

    #[error("element {element_id} of template {template_id} belongs to page {page}, which the template does not offer")]
    UnknownElementPage {
        template_id: String,
        element_id: ElementId,
        page: PageKey,
    },

    #[error("template {template_id} declares element {element_id} more than once")]
    DuplicateElement {
        template_id: String,
        element_id: ElementId,
    },
}

/// Kind of business a template is designed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Restaurant,
    Portfolio,
    Health,
}

/// A stored template definition
#[derive(Debug, Clone)]
pub struct TemplateDefinition {
    pub id: String,
    /// Display name
    pub name: String,
    pub category: TemplateCategory,
    /// Pages in navigation order
    pub pages: Vec<PageInfo>,
    pub themes: ThemeSet,
    /// Renderers used while editing
    pub edit_pages: PageTable,
    /// Renderers used for the published site
    pub display_pages: PageTable,
    /// Editable elements the page renderers draw
    pub elements: Vec<ElementSeed>,
}

impl TemplateDefinition {
    pub fn page(&self, key: PageKey) -> Option<&PageInfo> {
        self.pages.iter().find(|page| page.key == key)
    }

    pub fn has_page(&self, key: PageKey) -> bool {
        self.page(key).is_some()
    }

    /// Renderer table for the given mode
    pub fn page_table(&self, edit_mode: bool) -> &PageTable {
        if edit_mode {
            &self.edit_pages
        } else {
            &self.display_pages
        }
    }

    /// Check the structural rules every registered template obeys
    fn validate(&self) -> Result<(), TemplateError> {
        let template_id = || self.id.clone();

        let mut keys = BTreeSet::new();
        for page in &self.pages {
            if !keys.insert(page.key) {
                return Err(TemplateError::DuplicatePage {
                    template_id: template_id(),
                    page: page.key,
                });
            }
        }
        if !keys.contains(&PageKey::DEFAULT) {
            return Err(TemplateError::MissingDefaultPage {
                template_id: template_id(),
            });
        }

        for (mode, table) in [("edit", &self.edit_pages), ("display", &self.display_pages)] {
            let table_keys: BTreeSet<PageKey> = table.keys().collect();
            if let Some(page) = keys.symmetric_difference(&table_keys).next() {
                return Err(TemplateError::TableMismatch {
                    template_id: template_id(),
                    mode,
                    page: *page,
                });
            }
        }

        if !self.themes.contains(DEFAULT_THEME) {
            return Err(TemplateError::MissingDefaultTheme {
                template_id: template_id(),
            });
        }

        let mut element_ids = BTreeSet::new();
        for seed in &self.elements {
            if !keys.contains(&seed.page) {
                return Err(TemplateError::UnknownElementPage {
                    template_id: template_id(),
                    element_id: seed.id.clone(),
                    page: seed.page,
                });
            }
            if !element_ids.insert(&seed.id) {
                return Err(TemplateError::DuplicateElement {
                    template_id: template_id(),
                    element_id: seed.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Pages of `template` that `flags` switch on, in navigation order
///
/// The home page is always included.
pub fn available_pages<'t>(
    template: &'t TemplateDefinition,
    flags: &FeatureFlagSet,
) -> Vec<&'t PageInfo> {
    template
        .pages
        .iter()
        .filter(|page| flags.page_enabled(page.key))
        .collect()
}

static BUILTIN: LazyLock<TemplateRegistry> = LazyLock::new(catalog::build);

/// Registry for storing template definitions
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateDefinition>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in catalog, built on first use
    pub fn builtin() -> &'static TemplateRegistry {
        &BUILTIN
    }

    /// Register a template definition
    pub fn register(&mut self, def: TemplateDefinition) -> Result<(), TemplateError> {
        if self.templates.contains_key(&def.id) {
            return Err(TemplateError::Duplicate {
                template_id: def.id.clone(),
            });
        }
        def.validate()?;
        self.templates.insert(def.id.clone(), def);
        Ok(())
    }

    /// Get a template by id
    pub fn get(&self, template_id: &str) -> Option<&TemplateDefinition> {
        self.templates.get(template_id)
    }

    /// Get a template by id, failing with [`TemplateError::NotFound`]
    pub fn lookup(&self, template_id: &str) -> Result<&TemplateDefinition, TemplateError> {
        self.get(template_id).ok_or_else(|| TemplateError::NotFound {
            template_id: template_id.to_string(),
        })
    }

    /// Check if a template exists
    pub fn contains(&self, template_id: &str) -> bool {
        self.templates.contains_key(template_id)
    }

    /// Get all template ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// Iterate over all definitions in id order
    pub fn iter(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
