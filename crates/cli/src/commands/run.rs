//! `run` command implementation.

use anyhow::{Context, Result};
use dispatcher::SchedulerState;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_broadcast(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        source = %blueprint.source.path.display(),
        channel = ?blueprint.channel.channel_type,
        default_delay_secs = blueprint.delay.default_seconds,
        reporters = blueprint.reporters.len(),
        "Configuration loaded"
    );

    let delay_input = if args.ask_delay {
        Some(prompt_delay(blueprint.delay.default_seconds).await?)
    } else {
        args.delay.clone()
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        warn!("Received shutdown signal, stopping after the current recipient");
        let _ = shutdown_tx.send(true);

        wait_for_shutdown_signal().await;
        warn!("Second shutdown signal, exiting immediately");
        std::process::exit(130);
    });

    let pipeline_config = PipelineConfig {
        blueprint,
        delay_input,
        dry_run: args.dry_run,
        limit: (args.limit > 0).then_some(args.limit),
        send_timeout: (args.send_timeout > 0).then(|| Duration::from_secs(args.send_timeout)),
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
        shutdown: Some(shutdown_rx),
    };

    let stats = Pipeline::new(pipeline_config)
        .run()
        .await
        .map_err(|e| CliError::broadcast(format!("{e:#}")))?;

    if stats.report.state == SchedulerState::Stopped {
        warn!(
            not_contacted = stats.report.not_contacted,
            "Broadcast stopped early; remaining recipients were not contacted"
        );
    }
    info!(
        jobs = stats.report.total_jobs,
        succeeded = stats.report.succeeded,
        failed = stats.report.failed,
        duration_secs = stats.report.elapsed().as_secs_f64(),
        "Broadcast finished"
    );
    stats.print_summary();

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&stats.report)
            .context("Failed to serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Run report written");
    }

    Ok(())
}

/// Ask the operator for the delay in seconds
async fn prompt_delay(default_secs: u64) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            format!("⏱  Seconds to wait between messages (default {default_secs}): ").as_bytes(),
        )
        .await
        .map_err(CliError::Prompt)?;
    stdout.flush().await.map_err(CliError::Prompt)?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(CliError::Prompt)?;

    Ok(line.trim().to_string())
}

/// Resolves on Ctrl+C or SIGTERM
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
