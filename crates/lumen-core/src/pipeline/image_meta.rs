//! EXIF metadata extraction and normalization for image assets.
//!
//! The EXIF container is read leniently — images without one still produce
//! a full record with an empty `iptc` block. Unreadable files or
//! undecodable dimensions are hard per-asset errors.

use chrono::{DateTime, Utc};
use exif::{Context, In, Reader, Tag, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::ExtractionError;
use crate::types::{Dimensions, ImageMetadata, IptcData, Orientation, SourceAsset};
use crate::util::{encode_uri, sub_dir_of};

/// Windows XP keyword list, UTF-16LE in a byte field.
const TAG_XP_KEYWORDS: Tag = Tag(Context::Tiff, 0x9c9e);

/// Windows star rating, 0-5.
const TAG_RATING: Tag = Tag(Context::Tiff, 0x4746);

/// Extracts and normalizes metadata from image files.
pub struct ImageMetadataExtractor {
    limits: LimitsConfig,
}

impl ImageMetadataExtractor {
    /// Create a new extractor with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Extract the full normalized metadata record for one image asset.
    pub fn extract(&self, asset: &SourceAsset) -> Result<ImageMetadata, ExtractionError> {
        let stat = std::fs::metadata(&asset.path).map_err(|e| ExtractionError::Open {
            path: asset.path.clone(),
            message: e.to_string(),
        })?;
        let bytes = stat.len();
        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if bytes > max_bytes {
            return Err(ExtractionError::FileTooLarge {
                path: asset.path.clone(),
                size_mb: bytes / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        // Dimensions come from the codec's header read, independent of EXIF.
        let (width, height) =
            image::image_dimensions(&asset.path).map_err(|e| ExtractionError::Dimensions {
                path: asset.path.clone(),
                message: e.to_string(),
            })?;
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(ExtractionError::ImageTooLarge {
                path: asset.path.clone(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }
        let size = Dimensions { width, height };

        let exif = Self::read_exif(&asset.path);
        let iptc = exif.as_ref().map(Self::to_iptc_data).unwrap_or_default();
        let raw = exif.as_ref().map(Self::raw_field_map).unwrap_or_default();

        let dt_created = stat
            .created()
            .ok()
            .map(|t| DateTime::<Utc>::from(t).to_rfc3339());

        let orig_file = encode_uri(&asset.rel_path);
        let sub_dir = sub_dir_of(&orig_file);

        Ok(ImageMetadata {
            orig_path: asset.path.clone(),
            orig_file,
            sub_dir,
            ts: Utc::now().timestamp_millis().to_string(),
            orientation: Orientation::from_dimensions(size),
            size,
            iptc,
            exif: raw,
            bytes,
            dt_created,
        })
    }

    /// Read the EXIF container, returning `None` for images without one
    /// or with one we cannot parse.
    fn read_exif(path: &Path) -> Option<exif::Exif> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Some(exif),
            Err(e) => {
                tracing::debug!("No usable EXIF in {:?}: {}", path, e);
                None
            }
        }
    }

    /// Remap the fields we care about into the normalized IPTC record.
    fn to_iptc_data(exif: &exif::Exif) -> IptcData {
        let latitude = Self::gps_coord(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
        let longitude = Self::gps_coord(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);

        IptcData {
            creator: Self::string_field(exif, Tag::Artist),
            camera_make: Self::string_field(exif, Tag::Make),
            camera_model: Self::string_field(exif, Tag::Model),
            lens_model: Self::string_field(exif, Tag::LensModel),
            iso: Self::u32_field(exif, Tag::PhotographicSensitivity),
            f_number: Self::string_field(exif, Tag::FNumber).map(|s| format!("f/{s}")),
            exposure_time: Self::string_field(exif, Tag::ExposureTime),
            focal_length: Self::rational_field(exif, Tag::FocalLength),
            focal_length_35mm: Self::u32_field(exif, Tag::FocalLengthIn35mmFilm),
            rating: Self::u32_field(exif, TAG_RATING),
            software: Self::string_field(exif, Tag::Software),
            capture_date: Self::capture_date(exif),
            gps_lat_long: latitude.zip(longitude),
            keywords: Self::keywords(exif),
        }
    }

    /// Raw EXIF dump: primary-IFD fields as displayed values. MakerNote
    /// blobs are skipped — they are opaque and can run to kilobytes.
    fn raw_field_map(exif: &exif::Exif) -> BTreeMap<String, String> {
        exif.fields()
            .filter(|f| f.ifd_num == In::PRIMARY && f.tag != Tag::MakerNote)
            .map(|f| (f.tag.to_string(), f.display_value().to_string()))
            .collect()
    }

    /// Get a string field, stripped of the reader's quoting.
    fn string_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
        exif.get_field(tag, In::PRIMARY).map(|f| {
            let s = f.display_value().to_string();
            s.trim_matches('"').to_string()
        })
    }

    /// Get a u32 field.
    fn u32_field(exif: &exif::Exif, tag: Tag) -> Option<u32> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().map(|&x| x as u32),
                Value::Long(v) => v.first().copied(),
                _ => None,
            })
    }

    /// Get the first rational of a field as f32.
    fn rational_field(exif: &exif::Exif, tag: Tag) -> Option<f32> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(v) => v.first().map(|r| r.to_f64() as f32),
                _ => None,
            })
    }

    /// The capture timestamp, preferring DateTimeOriginal over the
    /// digitized create-date.
    fn capture_date(exif: &exif::Exif) -> Option<String> {
        exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTimeDigitized, In::PRIMARY))
            .map(|f| {
                let s = f.display_value().to_string();
                s.trim_matches('"').to_string()
            })
    }

    /// Get a GPS coordinate, converting degrees/minutes/seconds to decimal.
    fn gps_coord(exif: &exif::Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
        let coord = exif.get_field(coord_tag, In::PRIMARY)?;
        let reference = exif.get_field(ref_tag, In::PRIMARY)?;

        let degrees = Self::gps_rationals(&coord.value)?;
        let ref_str = reference.display_value().to_string();

        // Southern and western hemispheres are negative
        let sign = if ref_str.contains('S') || ref_str.contains('W') {
            -1.0
        } else {
            1.0
        };

        Some(sign * degrees)
    }

    /// Parse GPS rationals (degrees, minutes, seconds) to decimal degrees.
    fn gps_rationals(value: &Value) -> Option<f64> {
        match value {
            Value::Rational(rationals) if rationals.len() >= 3 => {
                let degrees = rationals[0].to_f64();
                let minutes = rationals[1].to_f64();
                let seconds = rationals[2].to_f64();
                Some(degrees + minutes / 60.0 + seconds / 3600.0)
            }
            _ => None,
        }
    }

    /// Decode the XPKeywords UTF-16LE byte field into a keyword list.
    fn keywords(exif: &exif::Exif) -> Option<Vec<String>> {
        let field = exif.get_field(TAG_XP_KEYWORDS, In::PRIMARY)?;
        let bytes = match &field.value {
            Value::Byte(v) => v,
            _ => return None,
        };
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let decoded = String::from_utf16_lossy(&units);
        let keywords: Vec<String> = decoded
            .trim_end_matches('\0')
            .split(';')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            None
        } else {
            Some(keywords)
        }
    }
}
