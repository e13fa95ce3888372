//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{BroadcastBlueprint, ChannelType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    source: String,
    sheet: Option<String>,
    channel: String,
    default_delay_seconds: u64,
    reporter_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    source: blueprint.source.path.display().to_string(),
                    sheet: blueprint.source.sheet.clone(),
                    channel: format!("{:?}", blueprint.channel.channel_type),
                    default_delay_seconds: blueprint.delay.default_seconds,
                    reporter_count: blueprint.reporters.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &BroadcastBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if !blueprint.source.path.exists() {
        warnings.push(format!(
            "Source file {} does not exist yet",
            blueprint.source.path.display()
        ));
    }

    if !blueprint.routing.media_base_dir.is_dir() {
        warnings.push(format!(
            "routing.media_base_dir {} is not a directory - every attachment will be skipped",
            blueprint.routing.media_base_dir.display()
        ));
    }

    if blueprint.channel.channel_type == ChannelType::Log {
        warnings.push("channel_type is \"log\" - messages will be logged, not delivered".to_string());
    }

    if blueprint.reporters.is_empty() {
        warnings.push("No reporters configured - progress goes to the log only".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Source: {}", summary.source);
            if let Some(ref sheet) = summary.sheet {
                println!("  Sheet: {}", sheet);
            }
            println!("  Channel: {}", summary.channel);
            println!("  Default delay: {}s", summary.default_delay_seconds);
            println!("  Reporters: {}", summary.reporter_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
