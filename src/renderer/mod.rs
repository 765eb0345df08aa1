//! HTML renderer for composed pages
//!
//! Page renderers write into an [`HtmlBuilder`]; the builder emits theme
//! tokens and layout rules ahead of the page body.

pub mod config;
pub mod html;

pub use config::HtmlConfig;
pub use html::{escape_html, HtmlBuilder, RootAttributes};
