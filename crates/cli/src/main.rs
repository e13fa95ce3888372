//! # Broadcaster CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 收件人预览
//! - 按间隔逐个发送与优雅关闭

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_broadcast, run_preview, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Broadcaster starting");

    let result = match &cli.command {
        Commands::Run(args) => run_broadcast(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Preview(args) => run_preview(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let config =
        ObservabilityConfig::from_verbosity(cli.log_format.clone().into(), cli.verbose, cli.quiet);
    observability::init_with_config(config)
}
