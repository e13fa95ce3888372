//! Pipeline orchestrator - wires source, normalizer, channel and reporters.

use std::time::Duration;

use anyhow::{Context, Result};
use contracts::{BroadcastBlueprint, ChannelAdapter, ContractError, DeliveryJob};
use dispatcher::{
    create_channel, create_reporters, DelayPolicy, DispatchScheduler,
    FanoutReporter, LogChannel, MediaCaptions, TimeoutChannel,
};
use ingestion::{open_source, JobNormalizer, JobSource, NormalizeStats};
use tokio::sync::watch;
use tracing::info;

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The broadcast blueprint
    pub blueprint: BroadcastBlueprint,

    /// Operator delay input, in seconds (None = configured default)
    pub delay_input: Option<String>,

    /// Use the log channel regardless of configuration
    pub dry_run: bool,

    /// Maximum number of jobs to dispatch (None = all)
    pub limit: Option<usize>,

    /// Per-send timeout (None = no timeout)
    pub send_timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Flips to `true` when the operator asks to stop
    pub shutdown: Option<watch::Receiver<bool>>,
}

/// Read and normalize the recipient sheet
pub fn load_jobs(
    blueprint: &BroadcastBlueprint,
    limit: Option<usize>,
) -> Result<(Vec<DeliveryJob>, NormalizeStats), ContractError> {
    let mut source = open_source(&blueprint.source)?;
    let rows = source.read_rows()?;

    let normalizer = JobNormalizer::new(blueprint.routing.clone());
    let (mut jobs, stats) = normalizer.normalize_with_stats(&rows);

    if let Some(limit) = limit {
        jobs.truncate(limit);
    }
    Ok((jobs, stats))
}

/// Main broadcast orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the broadcast to completion
    pub async fn run(self) -> Result<PipelineStats> {
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let blueprint = &self.config.blueprint;

        let mut delay = DelayPolicy::from_config(&blueprint.delay);
        if let Some(input) = &self.config.delay_input {
            println!("{}", delay.set(input).notice());
        }

        let mut reporter =
            create_reporters(&blueprint.reporters).context("Failed to create reporters")?;

        if self.config.dry_run {
            info!("Dry run - sends are logged, nothing is delivered");
            let channel = LogChannel::new("dry-run");
            return self.dispatch(channel, &delay, &mut reporter).await;
        }

        let channel = create_channel(&blueprint.channel)
            .await
            .context("Failed to create channel")?;
        self.dispatch(channel, &delay, &mut reporter).await
    }

    async fn dispatch<C: ChannelAdapter>(
        &self,
        channel: C,
        delay: &DelayPolicy,
        reporter: &mut FanoutReporter,
    ) -> Result<PipelineStats> {
        match self.config.send_timeout {
            Some(limit) => {
                let mut channel = TimeoutChannel::new(channel, limit);
                self.run_scheduler(&mut channel, delay, reporter).await
            }
            None => {
                let mut channel = channel;
                self.run_scheduler(&mut channel, delay, reporter).await
            }
        }
    }

    async fn run_scheduler<C: ChannelAdapter>(
        &self,
        channel: &mut C,
        delay: &DelayPolicy,
        reporter: &mut FanoutReporter,
    ) -> Result<PipelineStats> {
        let blueprint = &self.config.blueprint;
        let mut scheduler = DispatchScheduler::new(MediaCaptions::from(&blueprint.channel));
        if let Some(shutdown) = &self.config.shutdown {
            scheduler = scheduler.with_shutdown(shutdown.clone());
        }
        let mut normalize_stats = NormalizeStats::default();

        let channel_name = channel.name().to_string();
        let report = scheduler
            .start_with(
                || {
                    let (jobs, stats) = load_jobs(blueprint, self.config.limit)?;
                    normalize_stats = stats;
                    Ok(jobs)
                },
                delay,
                channel,
                reporter,
            )
            .await
            .context("Broadcast aborted")?;

        observability::record_run_duration_secs(report.elapsed().as_secs_f64());

        Ok(PipelineStats {
            channel: channel_name,
            dry_run: self.config.dry_run,
            normalize: normalize_stats,
            report,
        })
    }
}
