//! FanoutReporter - delivers each event to every configured reporter

use contracts::{ProgressEvent, ProgressReporter};

/// Reporter list, called in configuration order
#[derive(Default)]
pub struct FanoutReporter {
    reporters: Vec<Box<dyn ProgressReporter>>,
}

impl FanoutReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reporter: Box<dyn ProgressReporter>) {
        self.reporters.push(reporter);
    }

    pub fn with(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.push(Box::new(reporter));
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.reporters.iter().map(|r| r.name()).collect()
    }
}

impl ProgressReporter for FanoutReporter {
    fn name(&self) -> &str {
        "fanout"
    }

    fn report(&mut self, event: &ProgressEvent) {
        for reporter in &mut self.reporters {
            reporter.report(event);
        }
    }
}
