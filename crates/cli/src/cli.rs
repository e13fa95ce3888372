//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Broadcaster - paced multi-media message dispatch from a recipient sheet
#[derive(Parser, Debug)]
#[command(
    name = "broadcaster",
    author,
    version,
    about = "Paced multi-media broadcast dispatcher",
    long_about = "Reads a recipient sheet, builds one delivery job per row, and sends \n\
                  each job's attachments, text and link through the configured channel, \n\
                  waiting a fixed delay between recipients."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BROADCASTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BROADCASTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch every row of the recipient sheet
    Run(RunArgs),

    /// Validate configuration file without sending
    Validate(ValidateArgs),

    /// Show the normalized delivery jobs and the run estimate
    Preview(PreviewArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "broadcast.toml",
        env = "BROADCASTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Seconds between recipients (invalid input falls back to the default)
    #[arg(long, env = "BROADCASTER_DELAY", conflicts_with = "ask_delay")]
    pub delay: Option<String>,

    /// Prompt for the delay on stdin before sending
    #[arg(long)]
    pub ask_delay: bool,

    /// Use the log channel instead of the configured one
    #[arg(long)]
    pub dry_run: bool,

    /// Dispatch at most this many jobs (0 = all)
    #[arg(long, default_value = "0", env = "BROADCASTER_LIMIT")]
    pub limit: usize,

    /// Per-send timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "BROADCASTER_SEND_TIMEOUT")]
    pub send_timeout: u64,

    /// Write the run report as JSON to this file
    #[arg(long, env = "BROADCASTER_REPORT")]
    pub report: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BROADCASTER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "broadcast.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `preview` command
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "broadcast.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show at most this many jobs (0 = all)
    #[arg(long, default_value = "0")]
    pub limit: usize,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_parse() {
        let cli = Cli::try_parse_from([
            "broadcaster",
            "run",
            "--config",
            "campaign.toml",
            "--delay",
            "30",
            "--limit",
            "5",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("campaign.toml"));
                assert_eq!(args.delay.as_deref(), Some("30"));
                assert_eq!(args.limit, 5);
                assert!(args.dry_run);
                assert!(!args.ask_delay);
                assert_eq!(args.send_timeout, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_delay_conflicts_with_prompt() {
        let result =
            Cli::try_parse_from(["broadcaster", "run", "--delay", "10", "--ask-delay"]);
        assert!(result.is_err());
    }
}
