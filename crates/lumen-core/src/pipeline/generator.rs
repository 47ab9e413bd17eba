//! Rendition generation: executes a plan against the image codec.
//!
//! Entries are isolated — a failing policy is marked on its own entry and
//! the remaining renditions still run. The source is decoded once and
//! every rendition is produced from the same pixels.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::GenerationError;
use crate::policy::{PolicyKind, RenditionFormat};
use crate::types::{Dimensions, RenditionPlanEntry, RenditionStatus};

/// Executes rendition plans.
pub struct RenditionGenerator;

impl RenditionGenerator {
    /// Execute every entry of `plan`, writing under `renders_root` and
    /// annotating each entry with its outcome.
    ///
    /// A source that cannot be decoded fails the whole plan; anything
    /// after that (directory creation, resize, encode, write) fails only
    /// the entry it belongs to.
    pub fn generate(
        plan: &mut BTreeMap<String, RenditionPlanEntry>,
        source_path: &Path,
        renders_root: &Path,
    ) {
        if plan.is_empty() {
            return;
        }

        let image = match image::open(source_path) {
            Ok(image) => image,
            Err(e) => {
                let err = GenerationError::Decode {
                    path: source_path.to_path_buf(),
                    message: e.to_string(),
                };
                tracing::error!("{}", err);
                let message = err.to_string();
                for entry in plan.values_mut() {
                    entry.status = RenditionStatus::Error;
                    entry.error = Some(message.clone());
                }
                return;
            }
        };

        for entry in plan.values_mut() {
            match Self::generate_entry(&image, renders_root, entry) {
                Ok((bytes, dims)) => {
                    tracing::debug!(
                        "Saved rendition {} ({}x{}, {} bytes)",
                        entry.file,
                        dims.width,
                        dims.height,
                        bytes
                    );
                    entry.status = RenditionStatus::Success;
                    entry.file_size = Some(bytes);
                    entry.out_width = Some(dims.width);
                    entry.out_height = Some(dims.height);
                }
                Err(e) => {
                    tracing::warn!("Rendition {} failed: {}", entry.name, e);
                    entry.status = RenditionStatus::Error;
                    entry.error = Some(e.to_string());
                }
            }
        }
    }

    /// Produce one rendition: ensure the date partition exists, resize by
    /// kind, encode, and write.
    fn generate_entry(
        image: &DynamicImage,
        renders_root: &Path,
        entry: &RenditionPlanEntry,
    ) -> Result<(u64, Dimensions), GenerationError> {
        let partition = renders_root.join(&entry.date_dir);
        // Racing creation of the same partition by sibling assets is fine:
        // an existing directory is success.
        std::fs::create_dir_all(&partition).map_err(|e| GenerationError::Filesystem {
            path: partition.clone(),
            message: e.to_string(),
        })?;
        let output = partition.join(&entry.file);

        let resized = Self::resize(image, entry);
        let (out_width, out_height) = resized.dimensions();

        let mut buf = Vec::new();
        match entry.format {
            RenditionFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, entry.quality);
                resized
                    .to_rgb8()
                    .write_with_encoder(encoder)
                    .map_err(|e| GenerationError::Encode {
                        path: output.clone(),
                        message: e.to_string(),
                    })?;
            }
            RenditionFormat::Webp => {
                let encoder = WebPEncoder::new_lossless(&mut buf);
                resized
                    .to_rgba8()
                    .write_with_encoder(encoder)
                    .map_err(|e| GenerationError::Encode {
                        path: output.clone(),
                        message: e.to_string(),
                    })?;
            }
        }

        std::fs::write(&output, &buf).map_err(|e| GenerationError::Encode {
            path: output.clone(),
            message: e.to_string(),
        })?;

        Ok((
            buf.len() as u64,
            Dimensions {
                width: out_width,
                height: out_height,
            },
        ))
    }

    /// Resize by the entry's kind.
    fn resize(image: &DynamicImage, entry: &RenditionPlanEntry) -> DynamicImage {
        match entry.kind {
            PolicyKind::Square => {
                let size = entry.size.unwrap_or(0).max(1);
                image.resize_to_fill(size, size, FilterType::Lanczos3)
            }
            PolicyKind::Width => {
                // Clamp so the no-upscale invariant holds even if an
                // oversized target slipped into the plan.
                let target = entry.width.unwrap_or(0).max(1).min(image.width());
                image.resize(target, u32::MAX, FilterType::Lanczos3)
            }
            PolicyKind::Cover => {
                let width = entry.width.unwrap_or(0).max(1);
                let height = entry.height.unwrap_or(0).max(1);
                image.resize_to_fill(width, height, FilterType::Lanczos3)
            }
        }
    }
}
