//! ProgressReporter trait - structured run events
//!
//! Reporters are side-effect only. They never return errors to the scheduler;
//! a reporter that cannot write logs the problem and moves on.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ErrorDescriptor, PayloadKind};

/// Progress event emitted by the scheduler, in run order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    RunStarted {
        total_jobs: usize,
        delay_millis: u64,
        estimated_total_seconds: u64,
    },
    JobStarted {
        /// 1-based position in the queue
        index: usize,
        total: usize,
        recipient_id: String,
    },
    PayloadSent {
        recipient_id: String,
        kind: PayloadKind,
    },
    PayloadSkipped {
        recipient_id: String,
        kind: PayloadKind,
        path: PathBuf,
    },
    JobFailed {
        recipient_id: String,
        error: ErrorDescriptor,
    },
    RunCompleted {
        total_jobs: usize,
        succeeded: usize,
        failed: usize,
    },
    RunAborted {
        reason: String,
    },
}

impl ProgressEvent {
    /// Short event name (used for logging/metrics)
    pub fn name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::JobStarted { .. } => "job_started",
            Self::PayloadSent { .. } => "payload_sent",
            Self::PayloadSkipped { .. } => "payload_skipped",
            Self::JobFailed { .. } => "job_failed",
            Self::RunCompleted { .. } => "run_completed",
            Self::RunAborted { .. } => "run_aborted",
        }
    }
}

/// Progress sink
pub trait ProgressReporter: Send {
    /// Reporter name (used for logging)
    fn name(&self) -> &str;

    /// Consume one event
    fn report(&mut self, event: &ProgressEvent);
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn report(&mut self, event: &ProgressEvent) {
        (**self).report(event)
    }
}
