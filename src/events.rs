//! Element change notifications and the save outbox
//!
//! Every commit queues a [`PendingSave`]. The host drains the queue, persists
//! however it likes, and reports each ticket's outcome back. Listeners hear
//! about the commit and again about the outcome.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::element::{AnyContent, ElementChange, ElementId};
use crate::template::PageKey;

/// Handle for one queued save
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SaveTicket(u64);

impl SaveTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SaveTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "save-{}", self.0)
    }
}

/// Where a committed change stands with the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum SaveStatus {
    /// Committed locally, not yet confirmed
    Pending,
    Saved,
    /// Persisting failed; local state is kept as committed
    Failed(String),
}

/// What listeners receive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementEvent {
    pub ticket: SaveTicket,
    pub element_id: ElementId,
    /// Full merged content as committed
    pub content: AnyContent,
    pub status: SaveStatus,
}

/// A commit waiting to be persisted by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSave {
    pub ticket: SaveTicket,
    /// Page the element's override is saved with
    pub page: PageKey,
    /// Service-side id of that page
    pub page_id: String,
    pub change: ElementChange,
}

impl PendingSave {
    pub fn event(&self, status: SaveStatus) -> ElementEvent {
        ElementEvent {
            ticket: self.ticket,
            element_id: self.change.element_id.clone(),
            content: self.change.content.clone(),
            status,
        }
    }
}

/// Host callback for element events
pub type ChangeListener = Box<dyn FnMut(&ElementEvent)>;

/// Queue of saves, split into not-yet-taken and in-flight
#[derive(Debug, Default)]
pub struct Outbox {
    next: u64,
    queued: VecDeque<PendingSave>,
    in_flight: BTreeMap<SaveTicket, PendingSave>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a change and return its ticket
    pub fn enqueue(&mut self, page: PageKey, page_id: &str, change: ElementChange) -> &PendingSave {
        self.next += 1;
        self.queued.push_back(PendingSave {
            ticket: SaveTicket(self.next),
            page,
            page_id: page_id.to_string(),
            change,
        });
        &self.queued[self.queued.len() - 1]
    }

    /// Hand every queued save to the host; they stay tracked until reported
    pub fn take(&mut self) -> Vec<PendingSave> {
        let taken: Vec<PendingSave> = self.queued.drain(..).collect();
        for save in &taken {
            self.in_flight.insert(save.ticket, save.clone());
        }
        taken
    }

    /// Stop tracking `ticket`, whether queued or in flight
    pub fn settle(&mut self, ticket: SaveTicket) -> Option<PendingSave> {
        if let Some(save) = self.in_flight.remove(&ticket) {
            return Some(save);
        }
        let index = self.queued.iter().position(|save| save.ticket == ticket)?;
        self.queued.remove(index)
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
