//! DispatchOutcome - per-job result built by the scheduler

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::PayloadKind;

/// Recorded failure for a single job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Payload whose send failed
    pub kind: PayloadKind,
    /// Rendered error message
    pub message: String,
}

impl ErrorDescriptor {
    pub fn new(kind: PayloadKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// What happened to one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub recipient_id: String,
    /// Payloads the scheduler tried, including skipped attachments
    pub attempted: BTreeSet<PayloadKind>,
    /// Payloads acknowledged by the channel
    pub sent: BTreeSet<PayloadKind>,
    /// Attachments skipped because the file was missing at send time
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub skipped: BTreeSet<PayloadKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
}

impl DispatchOutcome {
    pub fn new(recipient_id: impl Into<String>) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            attempted: BTreeSet::new(),
            sent: BTreeSet::new(),
            skipped: BTreeSet::new(),
            error: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
