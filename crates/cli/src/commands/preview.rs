//! `preview` command implementation.

use anyhow::{Context, Result};
use contracts::{DeliveryJob, PayloadKind};
use dispatcher::DelayPolicy;
use serde::Serialize;
use tracing::info;

use crate::cli::PreviewArgs;
use crate::pipeline::load_jobs;

/// Preview for JSON output
#[derive(Serialize)]
struct Preview {
    rows_read: u64,
    rows_dropped: u64,
    job_count: usize,
    delay_seconds: u64,
    estimated_total_seconds: u64,
    jobs: Vec<DeliveryJob>,
}

/// Execute the `preview` command
pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    info!(config = %args.config.display(), "Building job preview");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let limit = (args.limit > 0).then_some(args.limit);
    let (jobs, stats) = load_jobs(&blueprint, limit).context("Failed to read recipient sheet")?;

    let delay = DelayPolicy::from_config(&blueprint.delay);
    let preview = Preview {
        rows_read: stats.rows_read,
        rows_dropped: stats.rows_dropped,
        job_count: jobs.len(),
        delay_seconds: delay.get() / 1000,
        estimated_total_seconds: delay.estimate_total_seconds(jobs.len()),
        jobs,
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&preview).context("Failed to serialize preview")?;
        println!("{}", json);
    } else {
        print_preview(&preview);
    }

    Ok(())
}

fn print_preview(preview: &Preview) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Broadcast Preview                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📋 Source");
    println!("   ├─ Rows read: {}", preview.rows_read);
    println!("   ├─ Rows without recipient: {}", preview.rows_dropped);
    println!("   └─ Jobs: {}", preview.job_count);

    println!("\n⏱  Pacing");
    println!("   ├─ Delay: {}s", preview.delay_seconds);
    println!(
        "   └─ Estimated total: {}s (~{} min)",
        preview.estimated_total_seconds,
        preview.estimated_total_seconds / 60
    );

    if !preview.jobs.is_empty() {
        println!("\n👥 Jobs ({})", preview.jobs.len());
        for (i, job) in preview.jobs.iter().enumerate() {
            let is_last = i == preview.jobs.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!(
                "   {} {:>4}. {} [{}]",
                prefix,
                i + 1,
                job.recipient_id,
                describe_payloads(job)
            );
        }
    }

    println!();
}

fn describe_payloads(job: &DeliveryJob) -> String {
    let kinds = job.payload_kinds();
    if kinds.is_empty() {
        return "nothing to send".to_string();
    }
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
