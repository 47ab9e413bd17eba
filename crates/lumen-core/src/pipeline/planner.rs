//! Rendition plan computation.
//!
//! Planning is pure: a function of the image's metadata and the policy
//! set, touching no filesystem. The same inputs always produce the same
//! filenames and date partition, which makes dry runs and idempotence
//! tests cheap.

use std::collections::BTreeMap;

use crate::datepath;
use crate::policy::RenditionPolicy;
use crate::types::{ImageMetadata, RenditionPlanEntry, RenditionStatus};

/// Compute the rendition plan for one image.
///
/// A policy is included iff it is required (cover) or its target width
/// fits within the source width — renditions are never upscaled. The date
/// partition is derived once from the capture date and shared by every
/// entry.
pub fn plan(
    metadata: &ImageMetadata,
    policies: &[RenditionPolicy],
) -> BTreeMap<String, RenditionPlanEntry> {
    let date_dir = datepath::resolve(metadata.iptc.capture_date.as_deref());
    let source_width = metadata.size.width;

    let mut entries = BTreeMap::new();
    for policy in policies {
        if !policy.is_required() && policy.target_width() > source_width {
            tracing::debug!(
                "Skipping rendition {}: target {}px exceeds source {}px",
                policy.name,
                policy.target_width(),
                source_width
            );
            continue;
        }

        entries.insert(
            policy.name.clone(),
            RenditionPlanEntry {
                name: policy.name.clone(),
                file: output_filename(metadata, policy),
                date_dir: date_dir.clone(),
                kind: policy.kind,
                size: policy.size,
                width: policy.width,
                height: policy.height,
                quality: policy.quality,
                format: policy.format,
                status: RenditionStatus::Pending,
                file_size: None,
                out_width: None,
                out_height: None,
                error: None,
            },
        );
    }
    entries
}

/// `<stem>.<policy>.q<quality>.<ext>`, with all whitespace stripped.
pub fn output_filename(metadata: &ImageMetadata, policy: &RenditionPolicy) -> String {
    let stem = metadata
        .orig_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    let file = format!(
        "{}.{}.q{}.{}",
        stem,
        policy.name,
        policy.quality,
        policy.format.extension()
    );
    file.chars().filter(|c| !c.is_whitespace()).collect()
}
