//! Starscan CLI
//!
//! Command-line interface around [`StarScanPipeline`]: argument parsing,
//! tracing setup, progress bars, and the final console summary.

use crate::config::{PipelineConfig, DEFAULT_BASE_URL, DEMO_API_KEY};
use crate::detector::DetectionParams;
use crate::pipeline::StarScanPipeline;
use crate::progress::{BarProgressReporter, ProgressReporter};
use crate::tracing_config::{TracingConfig, TracingFormat};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Download astronomy images and detect stars in them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "starscan")]
pub struct Cli {
    /// Catalog API key [default: $NASA_API_KEY, then the public DEMO_KEY]
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Catalog API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of random catalog items to request
    #[arg(short, long, default_value_t = 10)]
    pub count: u32,

    /// Directory for raw downloaded images
    #[arg(long, default_value = "space_images")]
    pub save_dir: PathBuf,

    /// Directory for annotated output images
    #[arg(long, default_value = "processed_images")]
    pub processed_dir: PathBuf,

    /// Minimum pixel intensity (0-255) counted as a bright star pixel
    #[arg(long, default_value_t = 200)]
    pub min_brightness: u8,

    /// Minimum blob area in pixels
    #[arg(long, default_value_t = 10)]
    pub min_area: u32,

    /// Maximum blob area in pixels (unbounded if omitted)
    #[arg(long)]
    pub max_area: Option<u32>,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Number of analysis worker threads (0 = one per available CPU)
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose).context("Failed to initialize tracing")?;

    let config = build_config(&cli).context("Invalid CLI arguments")?;

    let pipeline = StarScanPipeline::new(config).context("Failed to create pipeline")?;

    println!(
        "\n📡 Requesting {} images from {}...",
        pipeline.config().count,
        pipeline.config().base_url
    );

    let download_progress: Arc<dyn ProgressReporter> =
        Arc::new(BarProgressReporter::new("Downloading", "img"));
    let analysis_progress: Arc<dyn ProgressReporter> =
        Arc::new(BarProgressReporter::new("Analyzing", "img"));

    let report = pipeline
        .run(download_progress, analysis_progress)
        .await
        .context("Pipeline run failed")?;

    println!("\n✨ Run Summary 🚀");
    if report.failed_downloads > 0 {
        println!(
            "⚠️  {} of {} download(s) failed",
            report.failed_downloads, report.image_items
        );
    }
    for summary in &report.summaries {
        println!("🔍 {summary}");
    }
    println!(
        "\n🎉 Completed in {:.2} seconds! ({} requested, {} image item(s), {} analyzed)",
        report.elapsed.as_secs_f64(),
        report.requested,
        report.image_items,
        report.summaries.len()
    );

    Ok(())
}

/// Convert CLI arguments to pipeline configuration
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("NASA_API_KEY").ok())
        .unwrap_or_else(|| DEMO_API_KEY.to_string());

    let detection = DetectionParams {
        min_brightness: cli.min_brightness,
        min_area: cli.min_area,
        max_area: cli.max_area,
    };

    let timeout_secs = if cli.timeout == 0 {
        None
    } else {
        Some(cli.timeout)
    };

    let config = PipelineConfig::builder()
        .api_key(api_key)
        .base_url(cli.base_url.clone())
        .count(cli.count)
        .save_dir(cli.save_dir.clone())
        .processed_dir(cli.processed_dir.clone())
        .detection(detection)
        .timeout_secs(timeout_secs)
        .analysis_threads(cli.threads)
        .build()
        .context("Failed to build configuration")?;

    Ok(config)
}

/// Initialize tracing based on verbosity level
fn init_tracing(verbose_count: u8) -> Result<()> {
    TracingConfig::new()
        .with_verbosity(verbose_count)
        .with_format(TracingFormat::Console)
        .init()
        .context("Failed to initialize tracing subscriber")?;

    if verbose_count > 0 {
        tracing::debug!(verbosity = verbose_count, "Tracing initialized");
    }
    Ok(())
}
