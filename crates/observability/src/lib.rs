//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - Prometheus 指标导出
//! - ProgressEvent 指标收集
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init_with_config, metrics, LogFormat, ObservabilityConfig};
//!
//! // 初始化
//! init_with_config(ObservabilityConfig::from_verbosity(LogFormat::Pretty, 1, false))?;
//!
//! // 记录调度事件
//! metrics::record_progress_event(&event);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{record_progress_event, record_run_duration_secs};

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// Prometheus 端口 (None = 禁用)
    pub metrics_port: Option<u16>,
    /// 默认日志级别 (RUST_LOG 未设置时生效)
    pub default_log_level: String,
    /// 忽略 RUST_LOG，强制使用默认级别
    pub force_level: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_port: None,
            default_log_level: "info".to_string(),
            force_level: false,
        }
    }
}

impl ObservabilityConfig {
    /// 由命令行的 `-v` 次数与 `--quiet` 推导日志级别
    pub fn from_verbosity(log_format: LogFormat, verbose: u8, quiet: bool) -> Self {
        let default_log_level = if quiet {
            "warn"
        } else {
            match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };
        Self {
            log_format,
            metrics_port: None,
            default_log_level: default_log_level.to_string(),
            force_level: quiet,
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.force_level {
            return EnvFilter::new(&self.default_log_level);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_log_level))
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    Json,
    /// 人类可读格式
    #[default]
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// 使用自定义配置初始化
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(config.filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.default_log_level,
        "Observability initialized"
    );

    Ok(())
}

/// 仅初始化 Prometheus 指标（不初始化 Tracing）
///
/// 用于 Tracing 已由其他模块初始化的场景。
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.default_log_level, "info");
        assert!(!config.force_level);
    }

    #[test]
    fn test_verbosity_levels() {
        let level = |verbose, quiet| {
            ObservabilityConfig::from_verbosity(LogFormat::Compact, verbose, quiet).default_log_level
        };
        assert_eq!(level(0, false), "info");
        assert_eq!(level(1, false), "debug");
        assert_eq!(level(4, false), "trace");
        assert_eq!(level(0, true), "warn");

        let quiet = ObservabilityConfig::from_verbosity(LogFormat::Json, 0, true);
        assert!(quiet.force_level);
        assert_eq!(quiet.log_format, LogFormat::Json);
    }
}
