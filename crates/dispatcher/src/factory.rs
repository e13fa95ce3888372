//! Build channels and reporters from configuration

use std::path::Path;

use contracts::{
    ChannelAdapter, ChannelConfig, ChannelType, ContractError, ReporterConfig, ReporterType,
};
use tracing::{info, instrument};

use crate::channels::{GatewayChannel, LogChannel};
use crate::error::DispatcherError;
use crate::reporters::{FanoutReporter, JsonLinesReporter, LogReporter, MetricsReporter};

/// Channel selected by `channel.channel_type`
pub enum ConfiguredChannel {
    Log(LogChannel),
    Gateway(GatewayChannel),
}

impl ChannelAdapter for ConfiguredChannel {
    fn name(&self) -> &str {
        match self {
            Self::Log(c) => c.name(),
            Self::Gateway(c) => c.name(),
        }
    }

    async fn send_text(&mut self, recipient_id: &str, text: &str) -> Result<(), ContractError> {
        match self {
            Self::Log(c) => c.send_text(recipient_id, text).await,
            Self::Gateway(c) => c.send_text(recipient_id, text).await,
        }
    }

    async fn send_image(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        match self {
            Self::Log(c) => c.send_image(recipient_id, path, caption).await,
            Self::Gateway(c) => c.send_image(recipient_id, path, caption).await,
        }
    }

    async fn send_video(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        match self {
            Self::Log(c) => c.send_video(recipient_id, path, caption).await,
            Self::Gateway(c) => c.send_video(recipient_id, path, caption).await,
        }
    }

    async fn send_audio(&mut self, recipient_id: &str, path: &Path) -> Result<(), ContractError> {
        match self {
            Self::Log(c) => c.send_audio(recipient_id, path).await,
            Self::Gateway(c) => c.send_audio(recipient_id, path).await,
        }
    }

    async fn send_file(
        &mut self,
        recipient_id: &str,
        path: &Path,
        filename: &str,
        caption: &str,
    ) -> Result<(), ContractError> {
        match self {
            Self::Log(c) => c.send_file(recipient_id, path, filename, caption).await,
            Self::Gateway(c) => c.send_file(recipient_id, path, filename, caption).await,
        }
    }
}

/// Create the configured channel
///
/// A gateway channel connects here, so an unreachable bridge fails before
/// the run starts.
#[instrument(
    name = "dispatcher_create_channel",
    skip(config),
    fields(channel_type = ?config.channel_type)
)]
pub async fn create_channel(config: &ChannelConfig) -> Result<ConfiguredChannel, DispatcherError> {
    match config.channel_type {
        ChannelType::Log => Ok(ConfiguredChannel::Log(LogChannel::new("log"))),
        ChannelType::Gateway => {
            let channel = GatewayChannel::from_params("gateway", &config.params)
                .await
                .map_err(|e| DispatcherError::channel_creation("gateway", e.to_string()))?;
            Ok(ConfiguredChannel::Gateway(channel))
        }
    }
}

/// Create the reporter fan-out
///
/// An empty list gets a single log reporter.
pub fn create_reporters(configs: &[ReporterConfig]) -> Result<FanoutReporter, DispatcherError> {
    let mut fanout = FanoutReporter::new();

    if configs.is_empty() {
        fanout.push(Box::new(LogReporter::new("log")));
        return Ok(fanout);
    }

    for config in configs {
        match config.reporter_type {
            ReporterType::Log => fanout.push(Box::new(LogReporter::new(&config.name))),
            ReporterType::JsonLines => {
                let path = config.params.get("path").ok_or_else(|| {
                    DispatcherError::reporter_creation(&config.name, "missing 'path' parameter")
                })?;
                let reporter = JsonLinesReporter::new(&config.name, path)
                    .map_err(|e| DispatcherError::reporter_creation(&config.name, e.to_string()))?;
                fanout.push(Box::new(reporter));
            }
            ReporterType::Metrics => fanout.push(Box::new(MetricsReporter::new(&config.name))),
        }
    }

    info!(reporters = ?fanout.names(), "Reporters created");
    Ok(fanout)
}
