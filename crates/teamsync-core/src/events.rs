//! Change events and the stock sinks.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

use crate::traits::ChangeSink;

/// A change applied (or, in dry-run, planned) to a remote group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    GroupCreated {
        handle: String,
    },
    GroupRenamed {
        handle: String,
        from: String,
        to: String,
    },
    MembersAdded {
        handle: String,
        identities: Vec<String>,
    },
    MembersRemoved {
        handle: String,
        identities: Vec<String>,
    },
}

impl ChangeEvent {
    /// Handle of the group the event refers to.
    pub fn handle(&self) -> &str {
        match self {
            ChangeEvent::GroupCreated { handle }
            | ChangeEvent::GroupRenamed { handle, .. }
            | ChangeEvent::MembersAdded { handle, .. }
            | ChangeEvent::MembersRemoved { handle, .. } => handle,
        }
    }

    /// Machine-readable event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::GroupCreated { .. } => "group_created",
            ChangeEvent::GroupRenamed { .. } => "group_renamed",
            ChangeEvent::MembersAdded { .. } => "members_added",
            ChangeEvent::MembersRemoved { .. } => "members_removed",
        }
    }
}

/// Sink that keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<ChangeEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl ChangeSink for RecordingSink {
    fn emit(&self, event: ChangeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Sink that logs each event as a structured record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ChangeSink for TracingSink {
    fn emit(&self, event: ChangeEvent) {
        info!(
            kind = event.kind(),
            handle = event.handle(),
            change = %crate::report::describe_event(&event),
            "group change"
        );
    }
}

/// Forwards every event to several sinks.
pub struct FanoutSink<'a> {
    sinks: Vec<&'a dyn ChangeSink>,
}

impl<'a> FanoutSink<'a> {
    pub fn new(sinks: Vec<&'a dyn ChangeSink>) -> Self {
        Self { sinks }
    }
}

impl ChangeSink for FanoutSink<'_> {
    fn emit(&self, event: ChangeEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}
