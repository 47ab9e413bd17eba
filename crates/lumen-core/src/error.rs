//! Error types for the Lumen media pipeline.
//!
//! Errors are organized by stage and blast radius: scan failures are fatal
//! to a run, extraction failures are recovered per asset, generation
//! failures are recovered per rendition.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Lumen operations.
#[derive(Error, Debug)]
pub enum LumenError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Batch-level discovery errors.
///
/// A root that cannot be enumerated produces no partial results: the run
/// fails before any per-asset work is dispatched.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Source root does not exist
    #[error("Source root not found: {0}")]
    RootNotFound(PathBuf),

    /// Source root exists but is not a directory
    #[error("Source root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory traversal failed partway through
    #[error("Cannot enumerate {root}: {message}")]
    Unreadable { root: PathBuf, message: String },
}

/// Per-asset metadata extraction errors.
///
/// Recovered by the orchestrator: the asset is recorded with an error
/// message in its `ProcessingResult` and the batch proceeds.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// File could not be opened or stat'ed
    #[error("Cannot read {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// Pixel dimensions could not be determined
    #[error("Cannot read dimensions of {path}: {message}")]
    Dimensions { path: PathBuf, message: String },

    /// Audio tag container could not be parsed
    #[error("Cannot read tags from {path}: {message}")]
    Tags { path: PathBuf, message: String },

    /// File exceeds the configured size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed the configured limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },
}

/// Per-rendition generation errors.
///
/// Recovered per plan entry: a failed rendition is marked on its entry
/// while the remaining entries for the asset still run.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Source image could not be decoded
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Resized image could not be encoded or written
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Date-partition directory could not be created
    #[error("Cannot create output directory {path}: {message}")]
    Filesystem { path: PathBuf, message: String },
}

/// Batch orchestration errors. Only inputs outside the asset set (a missing
/// root, a dead worker) fail a run; per-asset failures never do.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Discovery failed before any asset was processed
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    /// A worker task could not be joined
    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Convenience type alias for Lumen results.
pub type Result<T> = std::result::Result<T, LumenError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
