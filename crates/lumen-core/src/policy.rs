//! Rendition policies: named target shapes for derived image artifacts.
//!
//! A policy describes one rendition — its shape, quality, and output
//! encoding. The `kind` field is explicit and validated at config load;
//! nothing is inferred from the policy name.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a rendition is produced from its source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Resize and crop to an exact `size` x `size` square.
    Square,
    /// Aspect-preserving resize so the output width is at most `width`.
    Width,
    /// Resize and crop to exactly `width` x `height`, preserving source
    /// proportions before the crop (object-fit: cover). Cover renditions
    /// are always generated regardless of source resolution.
    Cover,
}

/// Output encoding for a rendition.
///
/// `Webp` is the lossless web encoding; `Jpeg` is the lossy encoding with
/// the quality parameter passed through to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenditionFormat {
    Webp,
    Jpeg,
}

impl RenditionFormat {
    /// File extension for this encoding.
    pub fn extension(&self) -> &'static str {
        match self {
            RenditionFormat::Webp => "webp",
            RenditionFormat::Jpeg => "jpg",
        }
    }
}

/// A named rendition policy.
///
/// Configuration, not discovered data: policies come from the config file's
/// `[[rendition]]` tables and are validated against their declared kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenditionPolicy {
    /// Policy name, used in output filenames and result maps
    pub name: String,

    /// How the rendition is produced
    pub kind: PolicyKind,

    /// Square edge length in pixels (square policies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Target width in pixels (width and cover policies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Target height in pixels (cover policies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Encoder quality, 1-100
    pub quality: u8,

    /// Output encoding
    pub format: RenditionFormat,
}

impl RenditionPolicy {
    /// A square-thumbnail policy.
    pub fn square(name: &str, size: u32, quality: u8, format: RenditionFormat) -> Self {
        Self {
            name: name.to_string(),
            kind: PolicyKind::Square,
            size: Some(size),
            width: None,
            height: None,
            quality,
            format,
        }
    }

    /// A width-constrained resize policy.
    pub fn by_width(name: &str, width: u32, quality: u8, format: RenditionFormat) -> Self {
        Self {
            name: name.to_string(),
            kind: PolicyKind::Width,
            size: None,
            width: Some(width),
            height: None,
            quality,
            format,
        }
    }

    /// A cover-crop policy. Always generated, regardless of source size.
    pub fn cover(name: &str, width: u32, height: u32, quality: u8, format: RenditionFormat) -> Self {
        Self {
            name: name.to_string(),
            kind: PolicyKind::Cover,
            size: None,
            width: Some(width),
            height: Some(height),
            quality,
            format,
        }
    }

    /// Whether this rendition is generated regardless of source resolution.
    pub fn is_required(&self) -> bool {
        matches!(self.kind, PolicyKind::Cover)
    }

    /// The width the source must meet for a non-required policy to apply.
    pub fn target_width(&self) -> u32 {
        self.size.or(self.width).unwrap_or(0)
    }

    /// Check that the shape fields match the declared kind.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "rendition name must not be empty".into(),
            ));
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(ConfigError::ValidationError(format!(
                "rendition '{}': quality must be between 1 and 100",
                self.name
            )));
        }
        match self.kind {
            PolicyKind::Square => {
                if self.size.is_none() {
                    return Err(ConfigError::ValidationError(format!(
                        "rendition '{}': square policies require a size",
                        self.name
                    )));
                }
            }
            PolicyKind::Width => {
                if self.width.is_none() {
                    return Err(ConfigError::ValidationError(format!(
                        "rendition '{}': width policies require a width",
                        self.name
                    )));
                }
            }
            PolicyKind::Cover => {
                if self.width.is_none() || self.height.is_none() {
                    return Err(ConfigError::ValidationError(format!(
                        "rendition '{}': cover policies require width and height",
                        self.name
                    )));
                }
            }
        }
        if self.target_width() == 0 && !self.is_required() {
            return Err(ConfigError::ValidationError(format!(
                "rendition '{}': target dimension must be > 0",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_is_required() {
        let hero = RenditionPolicy::cover("hero", 1920, 1080, 80, RenditionFormat::Webp);
        assert!(hero.is_required());
        assert!(!RenditionPolicy::square("thumb", 400, 75, RenditionFormat::Jpeg).is_required());
        assert!(!RenditionPolicy::by_width("medium", 1200, 80, RenditionFormat::Jpeg).is_required());
    }

    #[test]
    fn test_target_width_prefers_size() {
        let thumb = RenditionPolicy::square("thumb", 400, 75, RenditionFormat::Jpeg);
        assert_eq!(thumb.target_width(), 400);
        let medium = RenditionPolicy::by_width("medium", 1200, 80, RenditionFormat::Jpeg);
        assert_eq!(medium.target_width(), 1200);
    }

    #[test]
    fn test_validate_rejects_mismatched_shape() {
        let mut policy = RenditionPolicy::square("thumb", 400, 75, RenditionFormat::Jpeg);
        policy.size = None;
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("square"));

        let mut cover = RenditionPolicy::cover("hero", 1920, 1080, 80, RenditionFormat::Webp);
        cover.height = None;
        assert!(cover.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let policy = RenditionPolicy::square("thumb", 400, 0, RenditionFormat::Jpeg);
        assert!(policy.validate().is_err());
        let policy = RenditionPolicy::square("thumb", 400, 101, RenditionFormat::Jpeg);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(RenditionFormat::Webp.extension(), "webp");
        assert_eq!(RenditionFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn test_policy_toml_roundtrip() {
        let toml = r#"
            name = "hero"
            kind = "cover"
            width = 1920
            height = 1080
            quality = 80
            format = "webp"
        "#;
        let policy: RenditionPolicy = toml::from_str(toml).unwrap();
        assert_eq!(policy.kind, PolicyKind::Cover);
        assert_eq!(policy.width, Some(1920));
        assert!(policy.validate().is_ok());
    }
}
