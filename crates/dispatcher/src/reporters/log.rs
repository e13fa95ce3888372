//! LogReporter - progress lines via tracing

use contracts::{ProgressEvent, ProgressReporter};
use tracing::{error, info, warn};

/// Human-facing progress output
pub struct LogReporter {
    name: String,
}

impl LogReporter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProgressReporter for LogReporter {
    fn name(&self) -> &str {
        &self.name
    }

    fn report(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted {
                total_jobs,
                delay_millis,
                estimated_total_seconds,
            } => info!(
                total_jobs,
                delay_secs = delay_millis / 1000,
                estimated_total_secs = estimated_total_seconds,
                "Starting broadcast"
            ),
            ProgressEvent::JobStarted {
                index,
                total,
                recipient_id,
            } => info!(
                progress = %format!("{index}/{total}"),
                recipient = %recipient_id,
                "Sending"
            ),
            ProgressEvent::PayloadSent { recipient_id, kind } => {
                info!(recipient = %recipient_id, kind = %kind, "Sent")
            }
            ProgressEvent::PayloadSkipped {
                recipient_id,
                kind,
                path,
            } => warn!(
                recipient = %recipient_id,
                kind = %kind,
                path = %path.display(),
                "File not found, skipped"
            ),
            ProgressEvent::JobFailed {
                recipient_id,
                error,
            } => error!(
                recipient = %recipient_id,
                kind = %error.kind,
                error = %error.message,
                "Send failed"
            ),
            ProgressEvent::RunCompleted {
                total_jobs,
                succeeded,
                failed,
            } => info!(total_jobs, succeeded, failed, "Broadcast finished"),
            ProgressEvent::RunAborted { reason } => {
                error!(reason = %reason, "Broadcast aborted")
            }
        }
    }
}
