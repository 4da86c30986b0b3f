//! Pipeline orchestration
//!
//! Ties the three phases together: one catalog fetch (fatal on error), the
//! async download fan-out, and the parallel analysis pass bridged onto the
//! blocking pool. Output directories are created up front.

use crate::analysis::StarAnalyzer;
use crate::catalog::{build_download_tasks, CatalogClient};
use crate::config::PipelineConfig;
use crate::download::{successful_files, ImageDownloader};
use crate::error::{Result, StarScanError};
use crate::progress::ProgressReporter;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a full pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Items requested from the catalog
    pub requested: u32,
    /// Image items the catalog actually returned
    pub image_items: usize,
    /// Files saved by the download stage
    pub downloaded: usize,
    /// Downloads that failed
    pub failed_downloads: usize,
    /// One summary line per analyzed file
    pub summaries: Vec<String>,
    /// Wall-clock time for the whole run
    pub elapsed: Duration,
}

/// The fetch → download → analyze pipeline
#[derive(Debug)]
pub struct StarScanPipeline {
    config: PipelineConfig,
    client: Client,
}

impl StarScanPipeline {
    /// Create a pipeline, validating configuration and building the shared
    /// HTTP client
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Pipeline configuration
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline
    ///
    /// The two reporters track the download and analysis stages
    /// independently. Only a catalog failure (or a filesystem/pool setup
    /// failure) aborts the run; per-item failures are reflected in the
    /// report instead.
    pub async fn run(
        &self,
        download_progress: Arc<dyn ProgressReporter>,
        analysis_progress: Arc<dyn ProgressReporter>,
    ) -> Result<PipelineReport> {
        let start = Instant::now();

        self.create_output_dirs().await?;

        // Phase 1: metadata fetch, fatal on any error
        let catalog = CatalogClient::new(self.client.clone(), &self.config);
        let items = catalog.fetch_image_items().await?;
        let tasks = build_download_tasks(&items);

        // Phase 2: concurrent download fan-out
        let downloader = ImageDownloader::new(self.client.clone(), &self.config.save_dir);
        let results = downloader.download_all(&tasks, download_progress).await;
        let files = successful_files(results);

        let image_items = tasks.len();
        let downloaded = files.len();
        log::info!("Downloaded {downloaded}/{image_items} image(s)");

        // Phase 3: CPU-bound analysis on the blocking pool
        let analyzer = StarAnalyzer::new(&self.config);
        let summaries = tokio::task::spawn_blocking(move || {
            analyzer.analyze_all(&files, analysis_progress.as_ref())
        })
        .await
        .map_err(|e| StarScanError::internal(format!("analysis stage aborted: {e}")))??;

        Ok(PipelineReport {
            requested: self.config.count,
            image_items,
            downloaded,
            failed_downloads: image_items - downloaded,
            summaries,
            elapsed: start.elapsed(),
        })
    }

    /// Create the raw and processed directories if absent
    async fn create_output_dirs(&self) -> Result<()> {
        for dir in [&self.config.save_dir, &self.config.processed_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StarScanError::file_io_error("create directory", dir, &e))?;
        }
        Ok(())
    }
}
