//! Batch orchestration: drives scan → extract → plan → generate.
//!
//! Per-asset work is independent, so assets fan out across a bounded
//! worker pool; within one asset, renditions run sequentially to bound
//! simultaneous codec work. Every discovered asset yields exactly one
//! `ProcessingResult`, success or failure, in discovery order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};

use crate::config::{Config, LimitsConfig};
use crate::error::{PipelineError, ScanError};
use crate::policy::RenditionPolicy;
use crate::types::{AssetKind, AssetMetadata, ProcessingResult, SourceAsset};

use super::audio_meta::AudioMetadataExtractor;
use super::generator::RenditionGenerator;
use super::image_meta::ImageMetadataExtractor;
use super::planner;
use super::scanner::Scanner;

/// Drives the full ingestion pipeline over a batch of discovered assets.
pub struct PipelineOrchestrator {
    scanner: Scanner,
    policies: Arc<Vec<RenditionPolicy>>,
    limits: LimitsConfig,
    parallel_workers: usize,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator from the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: Scanner::new(config.processing.clone()),
            policies: Arc::new(config.renditions.clone()),
            limits: config.limits.clone(),
            parallel_workers: config.processing.parallel_workers,
        }
    }

    /// Discover all assets of the requested kinds under `source_root`,
    /// images first, each kind in sorted path order.
    pub fn discover(
        &self,
        source_root: &Path,
        kinds: &[AssetKind],
    ) -> Result<Vec<SourceAsset>, ScanError> {
        let mut assets = Vec::new();
        for kind in kinds {
            assets.extend(self.scanner.scan(source_root, *kind)?);
        }
        Ok(assets)
    }

    /// Run the full pipeline: discover, then process every asset.
    ///
    /// Fails only on inputs outside the asset set (an unreadable root, a
    /// dead worker) — per-asset failures are recorded in their results.
    pub async fn run(
        &self,
        source_root: &Path,
        renders_root: &Path,
    ) -> Result<Vec<ProcessingResult>, PipelineError> {
        let assets = self.discover(source_root, &[AssetKind::Image, AssetKind::Audio])?;
        self.process(assets, renders_root, None, |_| {}).await
    }

    /// Process a batch of already-discovered assets.
    ///
    /// Work fans out across a worker pool bounded by the configured
    /// `parallel_workers`. A raised cancellation signal stops dispatching
    /// new assets; in-flight work finishes and is recorded. `on_result`
    /// fires as each asset completes (in completion order) so callers can
    /// stream progress; the returned list is in discovery order.
    pub async fn process<F>(
        &self,
        assets: Vec<SourceAsset>,
        renders_root: &Path,
        cancel: Option<watch::Receiver<bool>>,
        on_result: F,
    ) -> Result<Vec<ProcessingResult>, PipelineError>
    where
        F: Fn(&ProcessingResult) + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.parallel_workers));
        let on_result = Arc::new(on_result);
        let renders_root = renders_root.to_path_buf();
        let mut handles = Vec::with_capacity(assets.len());

        for asset in assets {
            if let Some(rx) = &cancel {
                if *rx.borrow() {
                    tracing::info!(
                        "Cancellation requested — {:?} and later assets not dispatched",
                        asset.path
                    );
                    break;
                }
            }

            let permit = semaphore.clone().acquire_owned().await;
            if permit.is_err() {
                tracing::warn!("Worker semaphore closed unexpectedly — stopping batch");
                break;
            }
            let permit = permit.unwrap();

            let policies = self.policies.clone();
            let limits = self.limits.clone();
            let renders_root = renders_root.clone();
            let on_result = on_result.clone();
            let source_path = asset.path.clone();
            let kind = asset.kind;

            let handle = tokio::spawn(async move {
                let result = match tokio::task::spawn_blocking(move || {
                    process_asset(&asset, &policies, &limits, &renders_root)
                })
                .await
                {
                    Ok(result) => result,
                    Err(e) => ProcessingResult::failed(
                        source_path,
                        kind,
                        format!("Worker panicked: {e}"),
                    ),
                };
                drop(permit); // Release pool slot before the callback
                on_result(&result);
                result
            });

            handles.push(handle);
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => return Err(PipelineError::Worker(e.to_string())),
            }
        }
        Ok(results)
    }
}

/// Run one asset through extract → plan → generate.
///
/// Never propagates: every failure is recorded on the result so the batch
/// proceeds.
fn process_asset(
    asset: &SourceAsset,
    policies: &[RenditionPolicy],
    limits: &LimitsConfig,
    renders_root: &Path,
) -> ProcessingResult {
    match asset.kind {
        AssetKind::Image => {
            let extractor = ImageMetadataExtractor::new(limits.clone());
            match extractor.extract(asset) {
                Ok(metadata) => {
                    let mut plan = planner::plan(&metadata, policies);
                    RenditionGenerator::generate(&mut plan, &asset.path, renders_root);
                    ProcessingResult {
                        source_path: asset.path.clone(),
                        kind: asset.kind,
                        metadata: Some(AssetMetadata::Image(Box::new(metadata))),
                        renditions: plan,
                        error: None,
                    }
                }
                Err(e) => extraction_failure(asset, e.to_string()),
            }
        }
        AssetKind::Audio => match AudioMetadataExtractor::extract(asset) {
            Ok(metadata) => ProcessingResult {
                source_path: asset.path.clone(),
                kind: asset.kind,
                metadata: Some(AssetMetadata::Audio(metadata)),
                renditions: Default::default(),
                error: None,
            },
            Err(e) => extraction_failure(asset, e.to_string()),
        },
    }
}

fn extraction_failure(asset: &SourceAsset, message: String) -> ProcessingResult {
    tracing::error!("Extraction failed for {:?}: {}", asset.path, message);
    ProcessingResult::failed(asset.path.clone(), asset.kind, message)
}

/// Absolute output path for a plan entry under a renders root.
pub fn renders_path(renders_root: &Path, date_dir: &str, file: &str) -> PathBuf {
    renders_root.join(date_dir).join(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RenditionStatus;
    use std::fs;

    fn config() -> Config {
        Config::default()
    }

    fn seed_tree(dir: &Path) {
        fs::create_dir_all(dir.join("album")).unwrap();
        image::DynamicImage::new_rgb8(120, 80)
            .save(dir.join("album/first.png"))
            .unwrap();
        image::DynamicImage::new_rgb8(80, 120)
            .save(dir.join("album/second.png"))
            .unwrap();
        // Image extension, garbage content: extraction must fail but the
        // batch must not.
        fs::write(dir.join("album/broken.jpg"), b"not an image").unwrap();
    }

    #[tokio::test]
    async fn test_run_isolates_per_asset_failures() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let renders = dir.path().join("renders");
        seed_tree(&source);

        let orchestrator = PipelineOrchestrator::new(&config());
        let results = orchestrator.run(&source, &renders).await.unwrap();

        assert_eq!(results.len(), 3);
        let failed: Vec<_> = results.iter().filter(|r| !r.is_success()).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].source_path.ends_with("broken.jpg"));
        assert!(failed[0].metadata.is_none());
        assert!(failed[0].renditions.is_empty());

        for result in results.iter().filter(|r| r.is_success()) {
            assert!(result.metadata.is_some());
            assert!(!result.renditions.is_empty());
        }
    }

    #[tokio::test]
    async fn test_results_are_in_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let renders = dir.path().join("renders");
        seed_tree(&source);

        let orchestrator = PipelineOrchestrator::new(&config());
        let assets = orchestrator
            .discover(&source, &[AssetKind::Image])
            .unwrap();
        let expected: Vec<_> = assets.iter().map(|a| a.path.clone()).collect();

        let results = orchestrator
            .process(assets, &renders, None, |_| {})
            .await
            .unwrap();
        let got: Vec<_> = results.iter().map(|r| r.source_path.clone()).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_renditions_land_in_date_partition() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let renders = dir.path().join("renders");
        fs::create_dir_all(&source).unwrap();
        image::DynamicImage::new_rgb8(120, 80)
            .save(source.join("pic.png"))
            .unwrap();

        let orchestrator = PipelineOrchestrator::new(&config());
        let results = orchestrator.run(&source, &renders).await.unwrap();
        assert_eq!(results.len(), 1);

        // No capture date in the fixture — partitions key off today
        for entry in results[0].renditions.values() {
            if entry.status == RenditionStatus::Success {
                assert_eq!(entry.date_dir, crate::datepath::today());
                assert!(renders_path(&renders, &entry.date_dir, &entry.file).exists());
            }
        }
    }

    #[tokio::test]
    async fn test_missing_root_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = PipelineOrchestrator::new(&config());
        let err = orchestrator
            .run(&dir.path().join("nope"), &dir.path().join("renders"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Scan(_)));
    }

    #[tokio::test]
    async fn test_pre_raised_cancellation_dispatches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let renders = dir.path().join("renders");
        seed_tree(&source);

        let orchestrator = PipelineOrchestrator::new(&config());
        let assets = orchestrator
            .discover(&source, &[AssetKind::Image])
            .unwrap();
        let (tx, rx) = watch::channel(true);
        let results = orchestrator
            .process(assets, &renders, Some(rx), |_| {})
            .await
            .unwrap();
        drop(tx);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_on_result_fires_per_asset() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let renders = dir.path().join("renders");
        seed_tree(&source);

        let orchestrator = PipelineOrchestrator::new(&config());
        let assets = orchestrator
            .discover(&source, &[AssetKind::Image])
            .unwrap();
        let expected = assets.len();

        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = counter.clone();
        let results = orchestrator
            .process(assets, &renders, None, move |_| {
                seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert_eq!(results.len(), expected);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), expected);
    }
}
