//! The `lumen ingest` command: batch media processing with progress,
//! result output, and a summary table.

use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use lumen_core::{
    AssetKind, Config, OutputFormat as CoreOutputFormat, OutputWriter, PipelineOrchestrator,
    ProcessingResult, RunStats,
};

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Which asset kinds a run processes.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindFilter {
    /// Images and audio
    All,
    /// Images only
    Image,
    /// Audio only
    Audio,
}

impl KindFilter {
    fn kinds(self) -> Vec<AssetKind> {
        match self {
            KindFilter::All => vec![AssetKind::Image, AssetKind::Audio],
            KindFilter::Image => vec![AssetKind::Image],
            KindFilter::Audio => vec![AssetKind::Audio],
        }
    }
}

/// Arguments for the `ingest` command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Source directory to ingest (defaults to the configured source dir)
    pub source: Option<PathBuf>,

    /// Renders output root (defaults to the configured renders dir)
    #[arg(short, long)]
    pub renders: Option<PathBuf>,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Asset kinds to process
    #[arg(short, long, value_enum, default_value = "all")]
    pub kind: KindFilter,

    /// Override the configured worker count
    #[arg(short, long)]
    pub parallel: Option<usize>,
}

/// Execute the ingest command.
pub async fn execute(mut config: Config, args: IngestArgs) -> anyhow::Result<()> {
    if let Some(parallel) = args.parallel {
        if parallel == 0 {
            anyhow::bail!("--parallel must be > 0");
        }
        config.processing.parallel_workers = parallel;
    }

    let source = args.source.clone().unwrap_or_else(|| config.source_dir());
    let renders = args.renders.clone().unwrap_or_else(|| config.renders_dir());

    let orchestrator = PipelineOrchestrator::new(&config);
    let assets = orchestrator.discover(&source, &args.kind.kinds())?;
    if assets.is_empty() {
        tracing::warn!("No media files found under {:?}", source);
        return Ok(());
    }
    tracing::info!("Found {} asset(s) under {:?}", assets.len(), source);

    // Ctrl-C stops dispatching new assets; in-flight work still lands.
    let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received — finishing in-flight assets");
            let _ = cancel_tx.send(true);
        }
    });

    let progress = create_progress_bar(assets.len() as u64);
    let tick = progress.clone();

    let start = std::time::Instant::now();
    let results = orchestrator
        .process(assets, &renders, Some(cancel_rx), move |result| {
            tick.inc(1);
            if let Some(name) = result.source_path.file_name() {
                tick.set_message(name.to_string_lossy().into_owned());
            }
        })
        .await?;
    let elapsed = start.elapsed();
    progress.finish_and_clear();

    write_results(&config, &args, &results)?;

    let stats = RunStats::from_results(&results, elapsed);
    print_summary(&stats);
    Ok(())
}

/// Emit the result records for the downstream storage layer.
fn write_results(
    config: &Config,
    args: &IngestArgs,
    results: &[ProcessingResult],
) -> anyhow::Result<()> {
    let format: CoreOutputFormat = args.format.into();

    if let Some(output_path) = &args.output {
        let file = File::create(output_path)?;
        let mut writer = OutputWriter::new(BufWriter::new(file), format, config.output.pretty);
        writer.write_all(results)?;
        writer.flush()?;
        tracing::info!("Results written to {:?}", output_path);
    } else {
        match format {
            CoreOutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(results)?);
            }
            CoreOutputFormat::JsonLines => {
                for result in results {
                    println!("{}", serde_json::to_string(result)?);
                }
            }
        }
    }
    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after a batch run.
fn print_summary(stats: &RunStats) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("    Renditions:   {:>8}", stats.renditions_written);
    if stats.renditions_failed > 0 {
        eprintln!("    Rend. errors: {:>8}", stats.renditions_failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>5.1} assets/sec", stats.assets_per_second);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_filter_expansion() {
        assert_eq!(KindFilter::All.kinds().len(), 2);
        assert_eq!(KindFilter::Image.kinds(), vec![AssetKind::Image]);
        assert_eq!(KindFilter::Audio.kinds(), vec![AssetKind::Audio]);
    }

    #[test]
    fn test_output_format_maps_to_core() {
        assert_eq!(
            CoreOutputFormat::from(OutputFormat::Json),
            CoreOutputFormat::Json
        );
        assert_eq!(
            CoreOutputFormat::from(OutputFormat::Jsonl),
            CoreOutputFormat::JsonLines
        );
    }
}
