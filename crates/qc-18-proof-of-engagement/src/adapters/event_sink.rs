//! # In-Memory Event Sink
//!
//! Collects emitted events for inspection.

use crate::events::PoeEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;

/// Event sink that keeps every event in emission order.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<PoeEvent>>,
}

impl InMemoryEventSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<PoeEvent> {
        self.events.lock().clone()
    }

    /// Drops all collected events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, events: Vec<PoeEvent>) {
        self.events.lock().extend(events);
    }
}
