//! File discovery for locating media assets under a source root.

use std::path::Path;
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::error::ScanError;
use crate::types::{AssetKind, SourceAsset};

/// Discovers media files of a given kind in a directory tree.
pub struct Scanner {
    config: ProcessingConfig,
}

impl Scanner {
    /// Create a new scanner with the given processing configuration.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Discover all files of `kind` under `root`, recursively.
    ///
    /// Paths are resolved to absolute and returned in deterministic
    /// (sorted) order. An unreadable root fails the scan outright — no
    /// partial enumeration is returned.
    pub fn scan(&self, root: &Path, kind: AssetKind) -> Result<Vec<SourceAsset>, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }
        let root = root.canonicalize().map_err(|e| ScanError::Unreadable {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut assets = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|e| ScanError::Unreadable {
                root: root.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && self.matches(path, kind) {
                assets.push(SourceAsset {
                    path: path.to_path_buf(),
                    rel_path: rel_path(&root, path),
                    kind,
                });
            }
        }

        // Sort by path for deterministic ordering
        assets.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(assets)
    }

    /// Check whether a file's extension belongs to `kind`'s set.
    fn matches(&self, path: &Path, kind: AssetKind) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.extensions_for(kind)
                    .iter()
                    .any(|e| e.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }

    /// The configured extension set for a kind.
    pub fn extensions_for(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Image => &self.config.image_extensions,
            AssetKind::Audio => &self.config.audio_extensions,
        }
    }
}

/// Root-relative path with a leading separator, `/`-delimited regardless
/// of platform.
fn rel_path(root: &Path, path: &Path) -> String {
    let stripped = path.strip_prefix(root).unwrap_or(path);
    let joined = stripped
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scanner() -> Scanner {
        Scanner::new(ProcessingConfig::default())
    }

    #[test]
    fn test_matches_image_extensions_case_insensitive() {
        let s = scanner();
        assert!(s.matches(Path::new("a.jpg"), AssetKind::Image));
        assert!(s.matches(Path::new("a.JPG"), AssetKind::Image));
        assert!(s.matches(Path::new("a.jpeg"), AssetKind::Image));
        assert!(s.matches(Path::new("a.png"), AssetKind::Image));
        assert!(!s.matches(Path::new("a.txt"), AssetKind::Image));
        assert!(!s.matches(Path::new("a.mp3"), AssetKind::Image));
    }

    #[test]
    fn test_matches_audio_extensions() {
        let s = scanner();
        for ext in ["mp3", "m4a", "mp4", "ogg", "flac"] {
            assert!(s.matches(Path::new(&format!("track.{ext}")), AssetKind::Audio));
        }
        assert!(!s.matches(Path::new("track.jpg"), AssetKind::Audio));
    }

    #[test]
    fn test_scan_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("album/b")).unwrap();
        fs::write(dir.path().join("album/b/two.jpg"), b"x").unwrap();
        fs::write(dir.path().join("album/one.png"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let assets = scanner().scan(dir.path(), AssetKind::Image).unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets[0].path < assets[1].path);
        assert!(assets.iter().all(|a| a.rel_path.starts_with("/album")));
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        let err = scanner()
            .scan(Path::new("/nonexistent/media/root"), AssetKind::Image)
            .unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound(_)));
    }

    #[test]
    fn test_scan_file_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        fs::write(&file, b"x").unwrap();
        let err = scanner().scan(&file, AssetKind::Image).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_rel_path_has_leading_separator() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/pic.jpg"), b"x").unwrap();

        let assets = scanner().scan(dir.path(), AssetKind::Image).unwrap();
        assert_eq!(assets[0].rel_path, "/sub/pic.jpg");
    }
}
