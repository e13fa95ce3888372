//! Run statistics and summary output.

use contracts::PayloadKind;
use dispatcher::RunReport;
use ingestion::NormalizeStats;

/// Statistics from a broadcast run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Channel that carried the sends
    pub channel: String,

    /// Whether the log channel replaced the configured one
    pub dry_run: bool,

    /// Row-to-job conversion counts
    pub normalize: NormalizeStats,

    /// Scheduler report
    pub report: RunReport,
}

impl PipelineStats {
    /// Failed jobs as percentage
    pub fn failure_rate(&self) -> f64 {
        if self.report.total_jobs > 0 {
            self.report.failed as f64 / self.report.total_jobs as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Broadcast Summary                         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!(
            "   ├─ Channel: {}{}",
            self.channel,
            if self.dry_run { " (dry run)" } else { "" }
        );
        println!("   ├─ Duration: {:.2}s", self.report.elapsed().as_secs_f64());
        println!("   ├─ Delay: {}s", self.report.delay_millis / 1000);
        println!(
            "   ├─ Estimated: {}s",
            self.report.estimated_total_seconds
        );
        println!("   ├─ Rows read: {}", self.normalize.rows_read);
        println!("   ├─ Rows dropped (no recipient): {}", self.normalize.rows_dropped);
        println!("   ├─ Jobs dispatched: {}", self.report.total_jobs);
        println!("   └─ Not contacted (stopped): {}", self.report.not_contacted);

        println!("\n📨 Delivery");
        println!("   ├─ Succeeded: {}", self.report.succeeded);
        println!(
            "   ├─ Failed: {} ({:.2}%)",
            self.report.failed,
            self.failure_rate()
        );
        println!("   ├─ Payloads sent: {}", self.report.payloads_sent());
        println!("   └─ Attachments skipped: {}", self.report.payloads_skipped());

        println!("\n📦 Sent by kind");
        let kinds = [
            PayloadKind::Image,
            PayloadKind::Video,
            PayloadKind::Audio,
            PayloadKind::File,
            PayloadKind::Text,
            PayloadKind::Url,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            let prefix = if i == kinds.len() - 1 { "└─" } else { "├─" };
            println!("   {} {}: {}", prefix, kind, self.report.sent_of_kind(*kind));
        }

        let failures: Vec<_> = self.report.failures().collect();
        if !failures.is_empty() {
            println!("\n⚠️  Failed recipients");
            for outcome in failures {
                if let Some(error) = &outcome.error {
                    println!(
                        "   ├─ {} ({}): {}",
                        outcome.recipient_id, error.kind, error.message
                    );
                }
            }
        }

        println!();
    }
}
