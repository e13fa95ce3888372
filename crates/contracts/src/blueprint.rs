//! BroadcastBlueprint - Config Loader output
//!
//! Describes a complete broadcast: where the rows come from, how recipients
//! are addressed, pacing, transport and progress routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Default delay between recipients, in seconds
pub const DEFAULT_DELAY_SECONDS: u64 = 25;

/// Complete broadcast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Recipient sheet
    pub source: SourceConfig,

    /// Recipient addressing and media resolution
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Pacing between recipients
    #[serde(default)]
    pub delay: DelayConfig,

    /// Messaging transport
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Progress routing
    #[serde(default)]
    pub reporters: Vec<ReporterConfig>,
}

/// Recipient sheet location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Workbook (.xlsx/.xls/.xlsm/.xlsb/.ods) or JSON rows file
    pub path: PathBuf,

    /// Sheet name; the first sheet when absent
    #[serde(default)]
    pub sheet: Option<String>,
}

/// Recipient sheet encoding, inferred from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Spreadsheet workbook
    Workbook,
    /// JSON array of row objects
    JsonRows,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            "json" => Some(Self::JsonRows),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Recipient address construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Prefix prepended to the raw identifier
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Suffix appended to the raw identifier
    #[serde(default = "default_address_suffix")]
    pub address_suffix: String,

    /// Base directory attachment paths are resolved against
    #[serde(default = "default_media_base_dir")]
    pub media_base_dir: PathBuf,
}

fn default_country_code() -> String {
    "57".to_string()
}

fn default_address_suffix() -> String {
    "@s.whatsapp.net".to_string()
}

fn default_media_base_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            address_suffix: default_address_suffix(),
            media_base_dir: default_media_base_dir(),
        }
    }
}

/// Pacing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Seconds between recipients when the operator does not override it
    #[serde(default = "default_delay_seconds")]
    pub default_seconds: u64,
}

fn default_delay_seconds() -> u64 {
    DEFAULT_DELAY_SECONDS
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            default_seconds: DEFAULT_DELAY_SECONDS,
        }
    }
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Transport type
    #[serde(default)]
    pub channel_type: ChannelType,

    /// Caption sent with images
    #[serde(default)]
    pub image_caption: String,

    /// Caption sent with videos
    #[serde(default)]
    pub video_caption: String,

    /// Caption sent with documents
    #[serde(default = "default_file_caption")]
    pub file_caption: String,

    /// Transport-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_file_caption() -> String {
    "📎 Attached file".to_string()
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_type: ChannelType::default(),
            image_caption: String::new(),
            video_caption: String::new(),
            file_caption: default_file_caption(),
            params: HashMap::new(),
        }
    }
}

/// Transport type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Logs each send, delivers nothing
    #[default]
    Log,
    /// JSON-lines bridge over TCP to the process owning the session
    Gateway,
}

/// Progress reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Reporter name
    pub name: String,

    /// Reporter type
    pub reporter_type: ReporterType,

    /// Reporter-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Reporter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReporterType {
    Log,
    JsonLines,
    Metrics,
}
