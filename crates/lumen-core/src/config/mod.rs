//! Configuration management for Lumen.
//!
//! Configuration is loaded from a platform config directory with sensible
//! defaults, including a default rendition policy set. Policies live in
//! config (`[[rendition]]` tables) — they are configuration, not
//! discovered data.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::policy::{RenditionFormat, RenditionPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Lumen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Processing settings
    pub processing: ProcessingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Rendition policy set, applied in order
    #[serde(rename = "rendition")]
    pub renditions: Vec<RenditionPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            processing: ProcessingConfig::default(),
            limits: LimitsConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            renditions: default_renditions(),
        }
    }
}

/// The stock policy set: a square thumbnail, two width-constrained
/// resizes, and a required hero cover.
fn default_renditions() -> Vec<RenditionPolicy> {
    vec![
        RenditionPolicy::square("thumb", 400, 75, RenditionFormat::Jpeg),
        RenditionPolicy::by_width("medium", 1200, 80, RenditionFormat::Jpeg),
        RenditionPolicy::by_width("large", 2048, 80, RenditionFormat::Jpeg),
        RenditionPolicy::cover("hero", 1920, 1080, 80, RenditionFormat::Webp),
    ]
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories; falls back to
    /// `~/.lumen/config.toml` if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "lumen", "lumen")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".lumen").join("config.toml")
            })
    }

    /// The resolved source root (with ~ expansion).
    pub fn source_dir(&self) -> PathBuf {
        expand(&self.general.source_dir)
    }

    /// The resolved renders root (with ~ expansion).
    pub fn renders_dir(&self) -> PathBuf {
        expand(&self.general.renders_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyKind;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.processing.parallel_workers, 4);
        assert_eq!(config.limits.max_file_size_mb, 200);
        assert_eq!(config.renditions.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_renditions_cover_spec_shapes() {
        let config = Config::default();
        let kinds: Vec<PolicyKind> = config.renditions.iter().map(|p| p.kind).collect();
        assert!(kinds.contains(&PolicyKind::Square));
        assert!(kinds.contains(&PolicyKind::Width));
        assert!(kinds.contains(&PolicyKind::Cover));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("[[rendition]]"));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.renditions.len(), config.renditions.len());
        assert_eq!(
            parsed.processing.audio_extensions,
            config.processing.audio_extensions
        );
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [processing]
            parallel_workers = 8

            [[rendition]]
            name = "tiny"
            kind = "square"
            size = 64
            quality = 50
            format = "jpeg"
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.processing.parallel_workers, 8);
        // Explicit policy tables replace the default set
        assert_eq!(config.renditions.len(), 1);
        assert_eq!(config.renditions[0].name, "tiny");
    }
}
