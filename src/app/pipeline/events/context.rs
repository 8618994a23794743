use crate::core::enrichment::query::QueryParams;
use crate::core::models::event::PluginEvent;
use parking_lot::RwLock;
use std::sync::OnceLock;
use strum::{AsRefStr, Display};

/// What happened to an event on its way through the pipeline
#[derive(Debug, AsRefStr, Display, Clone, Copy, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum EventOutcome {
    /// At least one query parameter was written
    Enriched,
    /// The url was parsed but no configured parameter matched
    Unchanged,
    /// No current url on the event, nothing to do
    Skipped,
    /// The event failed, host policy is to drop it
    Dropped,
}

/// Context for the per event pipeline. The event is the only mutable
/// state, everything else is filled once by the task that owns it
#[derive(Debug)]
pub struct EventContext {
    /// The event being enriched
    pub event: RwLock<PluginEvent>,
    /// The query of the event's current url, `None` if the event
    /// carried no url
    pub query: OnceLock<Option<QueryParams>>,
    pub outcome: OnceLock<EventOutcome>,
}

impl EventContext {
    pub fn new(event: PluginEvent) -> EventContext {
        EventContext {
            event: RwLock::new(event),
            query: OnceLock::new(),
            outcome: OnceLock::new(),
        }
    }

    pub fn into_event(self) -> PluginEvent {
        self.event.into_inner()
    }
}
