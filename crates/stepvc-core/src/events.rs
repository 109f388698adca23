//! Change-notification events.
//!
//! Emission is synchronous and best-effort. Each listener runs inside
//! `catch_unwind`; a panicking listener is logged and skipped, and neither
//! the remaining listeners nor the operation that emitted the event observe
//! the failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};

/// Event categories emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    CommitCreated,
    BranchCreated,
    BranchSwitched,
    TagCreated,
    SnapshotCreated,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::CommitCreated => "COMMIT_CREATED",
            EventKind::BranchCreated => "BRANCH_CREATED",
            EventKind::BranchSwitched => "BRANCH_SWITCHED",
            EventKind::TagCreated => "TAG_CREATED",
            EventKind::SnapshotCreated => "SNAPSHOT_CREATED",
        }
    }
}

/// One emitted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEvent {
    pub kind: EventKind,
    pub project_id: String,
    /// The created or affected record, serialized
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl VersionEvent {
    pub fn new(kind: EventKind, project_id: impl Into<String>, payload: Value) -> Self {
        Self {
            kind,
            project_id: project_id.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Handle returned by [`EventBus::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn Fn(&VersionEvent) + Send + Sync>;

/// Ordered listener registry
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; listeners run in registration order
    pub fn add_listener(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Unregister a listener. Returns false if the id was unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to every listener
    pub fn emit(&self, event: &VersionEvent) {
        for (id, listener) in &self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(event)));
            if let Err(payload) = outcome {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::warn!(
                    listener = id.0,
                    event = event.kind.as_str(),
                    project_id = %event.project_id,
                    reason = %reason,
                    "Event listener panicked; continuing"
                );
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
