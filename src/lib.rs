#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Starscan
//!
//! A two-phase pipeline for astronomy imagery: fetch a batch of image
//! metadata from a catalog API (NASA APOD-shaped), download the referenced
//! images concurrently, then run a CPU-bound star detection pass over every
//! saved file, producing annotated copies and one-line summaries.
//!
//! ## Pipeline shape
//!
//! - **Metadata fetch**: one GET, JSON array response, filtered to image
//!   items. Any failure here is fatal for the run.
//! - **Download stage**: uncapped async fan-out, one request per item,
//!   bodies streamed to `space_<index>.jpg`. Per-item failures are logged
//!   and recorded; siblings are unaffected. Results preserve input order.
//! - **Analysis stage**: parallel fan-out across a CPU-sized worker pool.
//!   Each job detects bright blobs, writes `detected_<file>`, and returns a
//!   summary string; decode failures become error strings instead.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use starscan::{run_pipeline, PipelineConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PipelineConfig::builder()
//!     .api_key("DEMO_KEY")
//!     .count(10)
//!     .build()?;
//!
//! let report = run_pipeline(config).await?;
//! for summary in &report.summaries {
//!     println!("{summary}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): command-line interface with progress bars; libraries
//!   can disable it to drop the clap/indicatif/tracing-subscriber stack.

pub mod analysis;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod detector;
pub mod download;
pub mod error;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use analysis::StarAnalyzer;
pub use catalog::{
    build_download_tasks, filter_image_items, parse_catalog_response, CatalogClient, CatalogItem,
    DownloadTask,
};
pub use config::{PipelineConfig, PipelineConfigBuilder, DEFAULT_BASE_URL, DEMO_API_KEY};
pub use detector::{annotate_stars, detect_stars, DetectedStar, DetectionParams};
pub use download::{successful_files, ImageDownloader};
pub use error::{Result, StarScanError};
pub use pipeline::{PipelineReport, StarScanPipeline};
pub use progress::{CountingProgressReporter, NoOpProgressReporter, ProgressReporter};

#[cfg(feature = "cli")]
pub use progress::BarProgressReporter;
#[cfg(feature = "cli")]
pub use tracing_config::{TracingConfig, TracingFormat};

use std::sync::Arc;

/// Run the full pipeline with no progress reporting
///
/// Convenience wrapper for library callers that only want the report; the
/// CLI wires its own progress bars through [`StarScanPipeline::run`].
pub async fn run_pipeline(config: PipelineConfig) -> Result<PipelineReport> {
    let pipeline = StarScanPipeline::new(config)?;
    let download_progress: Arc<dyn ProgressReporter> = Arc::new(NoOpProgressReporter::new());
    let analysis_progress: Arc<dyn ProgressReporter> = Arc::new(NoOpProgressReporter::new());
    pipeline.run(download_progress, analysis_progress).await
}
