//! Sub-configuration structs with pipeline defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings: where sources live and renders land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root of the source media tree
    pub source_dir: PathBuf,

    /// Root of the date-partitioned renders tree
    pub renders_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("~/media/source"),
            renders_dir: PathBuf::from("~/media/renders"),
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Width of the per-asset worker pool
    pub parallel_workers: usize,

    /// Extensions recognized as image assets (case-insensitive)
    pub image_extensions: Vec<String>,

    /// Extensions recognized as audio assets (case-insensitive)
    pub audio_extensions: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 4,
            image_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
            ],
            audio_extensions: vec![
                "mp3".to_string(),
                "m4a".to_string(),
                "mp4".to_string(),
                "ogg".to_string(),
                "flac".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum source file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum source image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
            max_image_dimension: 16000,
        }
    }
}

/// Output settings for the result stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
