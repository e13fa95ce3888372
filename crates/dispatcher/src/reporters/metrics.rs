//! MetricsReporter - forwards events to the metrics recorder

use contracts::{ProgressEvent, ProgressReporter};

/// Prometheus-facing reporter; a no-op until a recorder is installed
pub struct MetricsReporter {
    name: String,
}

impl MetricsReporter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProgressReporter for MetricsReporter {
    fn name(&self) -> &str {
        &self.name
    }

    fn report(&mut self, event: &ProgressEvent) {
        observability::record_progress_event(event);
    }
}
