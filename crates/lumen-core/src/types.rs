//! Core data types for the Lumen media pipeline.
//!
//! These types represent the output of processing a batch of source media:
//! normalized per-asset metadata plus the rendition outcomes for images.
//! Everything here is plain serializable data for the downstream storage
//! layer — no live handles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::policy::{PolicyKind, RenditionFormat};

/// Which class of media an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Audio,
}

/// A file discovered by the scanner.
///
/// Ephemeral: created during discovery and consumed by the orchestrator
/// immediately; never serialized.
#[derive(Debug, Clone)]
pub struct SourceAsset {
    /// Resolved absolute path to the file
    pub path: PathBuf,

    /// Root-relative path with a leading separator, `/`-delimited
    pub rel_path: String,

    /// Media kind the file was discovered as
    pub kind: AssetKind,
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Orientation derived from pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Portrait iff height exceeds width; ties resolve to landscape.
    pub fn from_dimensions(size: Dimensions) -> Self {
        if size.height > size.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Normalized descriptive and capture metadata for an image.
///
/// Absent fields are omitted from serialized output rather than emitted as
/// empty placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IptcData {
    /// Photographer / artist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Camera manufacturer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,

    /// Camera model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    /// Lens model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_model: Option<String>,

    /// ISO sensitivity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,

    /// Aperture (e.g., "f/2.8")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_number: Option<String>,

    /// Exposure time (e.g., "1/250")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,

    /// Focal length in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f32>,

    /// 35mm-equivalent focal length in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length_35mm: Option<u32>,

    /// Star rating, 0-5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,

    /// Editing/export software
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,

    /// Capture timestamp, original-capture preferred over create-date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_date: Option<String>,

    /// GPS position as a [latitude, longitude] pair in decimal degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_lat_long: Option<(f64, f64)>,

    /// Embedded keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// The normalized metadata record for one image asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Resolved absolute path to the source file
    pub orig_path: PathBuf,

    /// Root-relative source path, percent-encoded
    pub orig_file: String,

    /// Directory portion of `orig_file`; associates the asset with an album
    pub sub_dir: String,

    /// Extraction timestamp, epoch milliseconds as a string
    pub ts: String,

    /// Derived from pixel dimensions
    pub orientation: Orientation,

    /// Pixel dimensions
    pub size: Dimensions,

    /// Normalized descriptive/capture fields
    pub iptc: IptcData,

    /// Raw EXIF fields as displayed values, keyed by tag name
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub exif: BTreeMap<String, String>,

    /// Source file size in bytes
    pub bytes: u64,

    /// Filesystem creation time (export date, not capture date), RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dt_created: Option<String>,
}

/// The metadata record for one audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioMetadata {
    /// Track title from the tag container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// URL-safe derivation of the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Track duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,

    /// Root-relative source path, percent-encoded
    pub orig_file: String,

    /// Ordered path segments above the file
    pub folders: Vec<String>,
}

/// Extracted metadata, tagged by asset kind in serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetMetadata {
    Image(Box<ImageMetadata>),
    Audio(AudioMetadata),
}

/// Post-generation status of a plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenditionStatus {
    Pending,
    Success,
    Error,
}

/// One planned (and possibly executed) rendition of a source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenditionPlanEntry {
    /// Policy name this entry was planned from
    pub name: String,

    /// Computed output filename, whitespace stripped
    pub file: String,

    /// Date partition (`yyyy/yyyy-mm/yyyy-mm-dd`) shared by every
    /// rendition of the asset
    pub date_dir: String,

    /// Policy kind, carried so the generator needs no policy lookup
    pub kind: PolicyKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Encoder quality, 1-100
    pub quality: u8,

    /// Output encoding
    pub format: RenditionFormat,

    /// Outcome of generation
    pub status: RenditionStatus,

    /// Output file size in bytes, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    /// Actual output width, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_width: Option<u32>,

    /// Actual output height, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_height: Option<u32>,

    /// Failure message, on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The complete outcome for one discovered asset.
///
/// Every discovered asset yields exactly one of these, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Resolved absolute path to the source file
    pub source_path: PathBuf,

    /// Media kind the asset was discovered as
    pub kind: AssetKind,

    /// Extracted metadata; absent when extraction failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AssetMetadata>,

    /// Rendition outcomes keyed by policy name (images only)
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub renditions: BTreeMap<String, RenditionPlanEntry>,

    /// Recorded error when the asset failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    /// A result recording a per-asset failure.
    pub fn failed(source_path: PathBuf, kind: AssetKind, error: String) -> Self {
        Self {
            source_path,
            kind,
            metadata: None,
            renditions: BTreeMap::new(),
            error: Some(error),
        }
    }

    /// Whether metadata extraction succeeded for this asset.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunStats {
    /// Assets whose metadata extraction succeeded
    pub succeeded: usize,

    /// Assets recorded with an error
    pub failed: usize,

    /// Renditions written successfully
    pub renditions_written: usize,

    /// Renditions that failed to generate
    pub renditions_failed: usize,

    /// Wall-clock duration of the run in seconds
    pub total_seconds: f64,

    /// Processing rate in assets per second
    pub assets_per_second: f64,
}

impl RunStats {
    /// Aggregate stats over a completed batch.
    pub fn from_results(results: &[ProcessingResult], elapsed: std::time::Duration) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;
        let renditions_written = results
            .iter()
            .flat_map(|r| r.renditions.values())
            .filter(|e| e.status == RenditionStatus::Success)
            .count();
        let renditions_failed = results
            .iter()
            .flat_map(|r| r.renditions.values())
            .filter(|e| e.status == RenditionStatus::Error)
            .count();
        let total_seconds = elapsed.as_secs_f64();
        let assets_per_second = if total_seconds > 0.0 {
            results.len() as f64 / total_seconds
        } else {
            0.0
        };
        Self {
            succeeded,
            failed,
            renditions_written,
            renditions_failed,
            total_seconds,
            assets_per_second,
        }
    }
}
