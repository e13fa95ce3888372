//! RunReport - end-of-run summary

use std::time::Duration;

use contracts::{DispatchOutcome, PayloadKind};
use serde::Serialize;

use crate::scheduler::SchedulerState;

/// Summary of one dispatch run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: SchedulerState,
    pub total_jobs: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Queued jobs left untouched by a shutdown
    pub not_contacted: usize,
    pub delay_millis: u64,
    /// `total_jobs × delay` in seconds
    pub estimated_total_seconds: u64,
    pub elapsed_millis: u64,
    pub outcomes: Vec<DispatchOutcome>,
}

impl RunReport {
    pub fn new(
        state: SchedulerState,
        delay_millis: u64,
        estimated_total_seconds: u64,
        elapsed: Duration,
        outcomes: Vec<DispatchOutcome>,
    ) -> Self {
        let failed = outcomes.iter().filter(|o| o.is_failure()).count();
        Self {
            state,
            total_jobs: outcomes.len(),
            succeeded: outcomes.len() - failed,
            failed,
            not_contacted: 0,
            delay_millis,
            estimated_total_seconds,
            elapsed_millis: elapsed.as_millis() as u64,
            outcomes,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_millis)
    }

    /// Payloads acknowledged across all jobs
    pub fn payloads_sent(&self) -> usize {
        self.outcomes.iter().map(|o| o.sent.len()).sum()
    }

    /// Attachments skipped across all jobs
    pub fn payloads_skipped(&self) -> usize {
        self.outcomes.iter().map(|o| o.skipped.len()).sum()
    }

    /// Sent count for one payload kind
    pub fn sent_of_kind(&self, kind: PayloadKind) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.sent.contains(&kind))
            .count()
    }

    /// Outcomes that recorded a delivery failure
    pub fn failures(&self) -> impl Iterator<Item = &DispatchOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}
