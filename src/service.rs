//! Website data handle and the persistence service seam
//!
//! The engine never talks to storage directly. Page saves go through a
//! [`WebsiteDataService`]; [`InMemoryWebsiteService`] keeps everything in
//! memory for tests and local previews.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::template::PageKey;

/// Errors reported by a website data service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("website not found: {website_id}")]
    WebsiteNotFound { website_id: String },

    #[error("page not found: {page_id}")]
    PageNotFound { page_id: String },

    #[error("content patch must be a JSON object")]
    InvalidPatch,

    #[error("service unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Opaque website data supplied by the host, cheap to clone
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WebsiteData(Arc<Value>);

impl WebsiteData {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// String field at the top level, e.g. `businessName`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for WebsiteData {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// A website as the service stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteDetails {
    pub id: String,
    pub template_id: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// One stored page and its saved content patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: String,
    pub key: PageKey,
    pub name: String,
    /// `{element id: {field: value}}`
    #[serde(default)]
    pub content: Value,
}

/// Acknowledgement of a page save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub page_id: String,
    pub revision: u64,
}

/// Persistence collaborator
pub trait WebsiteDataService {
    fn fetch_website_details(&self, website_id: &str) -> Result<WebsiteDetails, ServiceError>;

    fn fetch_pages(&self, website_id: &str) -> Result<Vec<PageRecord>, ServiceError>;

    /// Merge `patch` into the stored content of `page_id`
    fn update_page_content(&self, page_id: &str, patch: &Value) -> Result<Ack, ServiceError>;
}

#[derive(Debug, Clone)]
struct StoredPage {
    website_id: String,
    record: PageRecord,
    revision: u64,
}

/// Website service backed by in-process maps
#[derive(Debug, Default)]
pub struct InMemoryWebsiteService {
    websites: BTreeMap<String, WebsiteDetails>,
    pages: RefCell<BTreeMap<String, StoredPage>>,
    failure: RefCell<Option<String>>,
    updates: Cell<usize>,
}

impl InMemoryWebsiteService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_website(mut self, details: WebsiteDetails) -> Self {
        self.websites.insert(details.id.clone(), details);
        self
    }

    pub fn with_page(mut self, website_id: &str, record: PageRecord) -> Self {
        self.pages.get_mut().insert(
            record.id.clone(),
            StoredPage {
                website_id: website_id.to_string(),
                record,
                revision: 0,
            },
        );
        self
    }

    /// Make every following update fail with `reason`; `None` heals
    pub fn fail_updates(&self, reason: Option<&str>) {
        *self.failure.borrow_mut() = reason.map(str::to_string);
    }

    /// Stored record of `page_id`
    pub fn page(&self, page_id: &str) -> Option<PageRecord> {
        self.pages
            .borrow()
            .get(page_id)
            .map(|stored| stored.record.clone())
    }

    /// Number of successful updates so far
    pub fn update_count(&self) -> usize {
        self.updates.get()
    }
}

impl WebsiteDataService for InMemoryWebsiteService {
    fn fetch_website_details(&self, website_id: &str) -> Result<WebsiteDetails, ServiceError> {
        self.websites
            .get(website_id)
            .cloned()
            .ok_or_else(|| ServiceError::WebsiteNotFound {
                website_id: website_id.to_string(),
            })
    }

    fn fetch_pages(&self, website_id: &str) -> Result<Vec<PageRecord>, ServiceError> {
        if !self.websites.contains_key(website_id) {
            return Err(ServiceError::WebsiteNotFound {
                website_id: website_id.to_string(),
            });
        }
        Ok(self
            .pages
            .borrow()
            .values()
            .filter(|stored| stored.website_id == website_id)
            .map(|stored| stored.record.clone())
            .collect())
    }

    fn update_page_content(&self, page_id: &str, patch: &Value) -> Result<Ack, ServiceError> {
        if let Some(reason) = self.failure.borrow().as_ref() {
            return Err(ServiceError::Unavailable {
                reason: reason.clone(),
            });
        }
        let Value::Object(patch) = patch else {
            return Err(ServiceError::InvalidPatch);
        };

        let mut pages = self.pages.borrow_mut();
        let stored = pages
            .get_mut(page_id)
            .ok_or_else(|| ServiceError::PageNotFound {
                page_id: page_id.to_string(),
            })?;

        let mut content = match &stored.record.content {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for (key, value) in patch {
            content.insert(key.clone(), value.clone());
        }
        stored.record.content = Value::Object(content);
        stored.revision += 1;
        self.updates.set(self.updates.get() + 1);

        Ok(Ack {
            page_id: page_id.to_string(),
            revision: stored.revision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service() -> InMemoryWebsiteService {
        InMemoryWebsiteService::new()
            .with_website(WebsiteDetails {
                id: "w1".to_string(),
                template_id: "bistro".to_string(),
                theme: None,
                data: json!({"businessName": "Chez Nous"}),
            })
            .with_page(
                "w1",
                PageRecord {
                    id: "p-home".to_string(),
                    key: PageKey::Home,
                    name: "Home".to_string(),
                    content: json!({"a": {"text": "old"}}),
                },
            )
    }

    #[test]
    fn test_website_data_reads_strings() {
        let data = WebsiteData::new(json!({"businessName": "Chez Nous", "rating": 5}));
        assert_eq!(data.get_str("businessName"), Some("Chez Nous"));
        assert_eq!(data.get_str("rating"), None);
        assert_eq!(WebsiteData::default().get_str("businessName"), None);
    }

    #[test]
    fn test_fetch_pages_of_website() {
        let service = service();
        assert_eq!(service.fetch_pages("w1").unwrap().len(), 1);
        assert!(matches!(
            service.fetch_pages("w2"),
            Err(ServiceError::WebsiteNotFound { .. })
        ));
    }

    #[test]
    fn test_update_merges_patch() {
        let service = service();
        let ack = service
            .update_page_content("p-home", &json!({"b": {"text": "new"}}))
            .unwrap();
        assert_eq!(ack.revision, 1);
        assert_eq!(
            service.page("p-home").unwrap().content,
            json!({"a": {"text": "old"}, "b": {"text": "new"}})
        );
        assert_eq!(service.update_count(), 1);
    }

    #[test]
    fn test_update_failures() {
        let service = service();
        assert_eq!(
            service.update_page_content("p-home", &json!([])),
            Err(ServiceError::InvalidPatch)
        );
        assert!(matches!(
            service.update_page_content("p-none", &json!({})),
            Err(ServiceError::PageNotFound { .. })
        ));
        service.fail_updates(Some("offline"));
        assert!(matches!(
            service.update_page_content("p-home", &json!({})),
            Err(ServiceError::Unavailable { .. })
        ));
        service.fail_updates(None);
        assert!(service.update_page_content("p-home", &json!({})).is_ok());
    }
}
