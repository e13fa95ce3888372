//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Resolve relative paths against the config file's directory
//! - Generate `BroadcastBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("broadcast.toml")).unwrap();
//! println!("Source: {}", blueprint.source.path.display());
//! ```

mod parser;
mod validator;

pub use contracts::BroadcastBlueprint;
pub use parser::ConfigFormat;

use contracts::{ContractError, ReporterType};
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    /// Relative `source.path`, `routing.media_base_dir` and json_lines
    /// reporter paths are resolved against the directory containing the
    /// config file.
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<BroadcastBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        let mut blueprint = Self::load_from_str(&content, format)?;
        if let Some(base) = path.parent() {
            Self::rebase_paths(&mut blueprint, base);
        }
        Ok(blueprint)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<BroadcastBlueprint, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize BroadcastBlueprint to TOML string
    pub fn to_toml(blueprint: &BroadcastBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize BroadcastBlueprint to JSON string
    pub fn to_json(blueprint: &BroadcastBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<BroadcastBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    fn rebase_paths(blueprint: &mut BroadcastBlueprint, base: &Path) {
        if blueprint.source.path.is_relative() {
            blueprint.source.path = base.join(&blueprint.source.path);
        }
        if blueprint.routing.media_base_dir.is_relative() {
            blueprint.routing.media_base_dir = base.join(&blueprint.routing.media_base_dir);
        }
        for reporter in &mut blueprint.reporters {
            if reporter.reporter_type != ReporterType::JsonLines {
                continue;
            }
            if let Some(path) = reporter.params.get_mut("path") {
                if Path::new(path.as_str()).is_relative() {
                    *path = base.join(path.as_str()).display().to_string();
                }
            }
        }
    }
}
