//! Lumen Core - Embeddable media ingestion and rendition library.
//!
//! Lumen takes a tree of source media (photographs, audio) and produces
//! structured metadata plus policy-driven image renditions written into a
//! date-partitioned output tree, feeding a separately-owned storage layer.
//!
//! # Architecture
//!
//! ```text
//! Scan → Extract Metadata → Plan Renditions → Generate → ProcessingResult
//! ```
//!
//! Per-asset work runs on a bounded worker pool; one bad file never aborts
//! a batch.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumen_core::{Config, PipelineOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> lumen_core::Result<()> {
//!     let config = Config::load()?;
//!     let orchestrator = PipelineOrchestrator::new(&config);
//!
//!     let results = orchestrator
//!         .run(&config.source_dir(), &config.renders_dir())
//!         .await
//!         .map_err(lumen_core::LumenError::Pipeline)?;
//!     println!("{} assets processed", results.len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod datepath;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod types;
pub mod util;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, ExtractionError, GenerationError, LumenError, PipelineError, PipelineResult,
    Result, ScanError,
};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{PipelineOrchestrator, Scanner};
pub use policy::{PolicyKind, RenditionFormat, RenditionPolicy};
pub use types::{
    AssetKind, AssetMetadata, AudioMetadata, Dimensions, ImageMetadata, IptcData, Orientation,
    ProcessingResult, RenditionPlanEntry, RenditionStatus, RunStats, SourceAsset,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
