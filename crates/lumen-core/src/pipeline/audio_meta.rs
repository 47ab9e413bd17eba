//! Audio tag extraction for audio assets.

use lofty::{Accessor, AudioFile, Probe, TaggedFileExt};

use crate::error::ExtractionError;
use crate::types::{AudioMetadata, SourceAsset};
use crate::util::{encode_uri, to_folders, to_slug};

/// Extracts tag metadata from audio files.
pub struct AudioMetadataExtractor;

impl AudioMetadataExtractor {
    /// Extract the metadata record for one audio asset.
    ///
    /// A readable container without tags still yields a record — `title`
    /// and `slug` are simply absent. An unreadable or unparseable file is
    /// a per-asset error.
    pub fn extract(asset: &SourceAsset) -> Result<AudioMetadata, ExtractionError> {
        let tagged = Probe::open(&asset.path)
            .map_err(|e| ExtractionError::Open {
                path: asset.path.clone(),
                message: e.to_string(),
            })?
            .read()
            .map_err(|e| ExtractionError::Tags {
                path: asset.path.clone(),
                message: e.to_string(),
            })?;

        let tag = tagged.primary_tag().or_else(|| tagged.first_tag());
        let title = tag.and_then(|t| t.title().map(|c| c.to_string()));
        let slug = title.as_deref().map(to_slug);
        let duration = tagged.properties().duration();

        Ok(AudioMetadata {
            title,
            slug,
            duration_secs: Some(duration.as_secs_f64()),
            orig_file: encode_uri(&asset.rel_path),
            folders: to_folders(&asset.rel_path),
        })
    }
}
