//! RecordingReporter - keeps every event in memory, for tests and summaries

use std::sync::{Arc, Mutex};

use contracts::{ProgressEvent, ProgressReporter};

/// Clones share one event buffer
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events seen so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Event names in order
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(ProgressEvent::name).collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn name(&self) -> &str {
        "recording"
    }

    fn report(&mut self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
