//! Pluggable site templates
//!
//! A template is an immutable definition: the pages it offers, its named
//! themes, one page-renderer table for edit mode and one for display mode,
//! and the editable elements its pages draw. The compiled-in catalog is
//! available through [`TemplateRegistry::builtin`].
//!
//! # Example
//!
//! ```rust
//! use site_composer::template::{PageKey, TemplateRegistry};
//!
//! let bistro = TemplateRegistry::builtin().lookup("bistro").unwrap();
//! assert!(bistro.has_page(PageKey::Home));
//! assert!(TemplateRegistry::builtin().lookup("missing").is_err());
//! ```

mod catalog;
mod page;
pub mod pages;
mod registry;

pub use page::{PageInfo, PageKey};
pub use registry::{
    available_pages, TemplateCategory, TemplateDefinition, TemplateError, TemplateRegistry,
};
