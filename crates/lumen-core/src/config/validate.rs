//! Configuration validation with range and policy-shape checks.

use std::collections::HashSet;

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges and the
    /// rendition policy set is well-formed.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.processing.image_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.image_extensions must not be empty".into(),
            ));
        }
        if self.processing.audio_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.audio_extensions must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }

        let mut names = HashSet::new();
        for policy in &self.renditions {
            policy.validate()?;
            if !names.insert(policy.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate rendition name '{}'",
                    policy.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{RenditionFormat, RenditionPolicy};

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_parallel_workers() {
        let mut config = Config::default();
        config.processing.parallel_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parallel_workers"));
    }

    #[test]
    fn test_validate_rejects_empty_extension_set() {
        let mut config = Config::default();
        config.processing.image_extensions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("image_extensions"));
    }

    #[test]
    fn test_validate_rejects_duplicate_policy_names() {
        let mut config = Config::default();
        config
            .renditions
            .push(RenditionPolicy::square("thumb", 100, 60, RenditionFormat::Jpeg));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_rejects_malformed_policy() {
        let mut config = Config::default();
        let mut bad = RenditionPolicy::cover("banner", 1200, 600, 80, RenditionFormat::Jpeg);
        bad.width = None;
        config.renditions.push(bad);
        assert!(config.validate().is_err());
    }
}
