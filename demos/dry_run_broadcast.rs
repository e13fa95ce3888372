//! Dry-run Broadcast Example
//!
//! Loads a broadcast config, reads its recipient sheet and dispatches every
//! job through the log channel, so nothing is delivered.
//!
//! Run with: cargo run -p demos -- demos/broadcast.toml [delay-seconds]

use std::path::Path;

use config_loader::ConfigLoader;
use dispatcher::{
    create_reporters, DelayPolicy, DispatchScheduler, LogChannel, MediaCaptions,
};
use ingestion::{open_source, JobNormalizer, JobSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/broadcast.toml".to_string());
    tracing::info!(path = %config, "Loading broadcast config");
    let blueprint = ConfigLoader::load_from_path(Path::new(&config))?;

    // ==== Stage 1: Read and normalize the recipient sheet ====
    let mut source = open_source(&blueprint.source)?;
    let rows = source.read_rows()?;
    let (jobs, stats) = JobNormalizer::new(blueprint.routing.clone()).normalize_with_stats(&rows);
    tracing::info!(
        rows = stats.rows_read,
        dropped = stats.rows_dropped,
        jobs = jobs.len(),
        "Recipient sheet loaded"
    );

    // ==== Stage 2: Pacing ====
    let mut delay = DelayPolicy::from_config(&blueprint.delay);
    if let Some(input) = std::env::args().nth(2) {
        println!("{}", delay.set(&input).notice());
    }

    // ==== Stage 3: Dispatch through the log channel ====
    let mut channel = LogChannel::new("demo");
    let mut reporter = create_reporters(&blueprint.reporters)?;
    let mut scheduler = DispatchScheduler::new(MediaCaptions::from(&blueprint.channel));

    let report = scheduler
        .start(jobs, &delay, &mut channel, &mut reporter)
        .await?;

    println!(
        "Done: {} jobs, {} succeeded, {} failed, {} payloads logged, {} attachments skipped",
        report.total_jobs,
        report.succeeded,
        report.failed,
        report.payloads_sent(),
        report.payloads_skipped()
    );
    Ok(())
}
