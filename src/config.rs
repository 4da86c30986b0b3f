//! Configuration types for the star scanning pipeline

use crate::detector::DetectionParams;
use crate::error::{Result, StarScanError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default catalog endpoint (NASA Astronomy Picture of the Day)
pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Public demo key accepted by the NASA API (heavily rate limited)
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Configuration for a full pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// API key passed as the `api_key` query parameter
    pub api_key: String,

    /// Catalog API base URL
    pub base_url: String,

    /// Number of random catalog items to request
    pub count: u32,

    /// Directory for raw downloaded images
    pub save_dir: PathBuf,

    /// Directory for annotated output images
    pub processed_dir: PathBuf,

    /// Star detection parameters
    pub detection: DetectionParams,

    /// Per-request timeout in seconds (None = wait forever)
    ///
    /// The original pipeline had no timeout at all; a hung request would
    /// stall the whole download stage. A finite default closes that gap.
    pub timeout_secs: Option<u64>,

    /// Number of analysis worker threads (0 = one per available CPU)
    pub analysis_threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            count: 10,
            save_dir: PathBuf::from("space_images"),
            processed_dir: PathBuf::from("processed_images"),
            detection: DetectionParams::default(),
            timeout_secs: Some(60),
            analysis_threads: 0,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder for fluent construction
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Request timeout as a [`Duration`], if configured
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(StarScanError::invalid_config("api key cannot be empty"));
        }
        if self.base_url.is_empty() {
            return Err(StarScanError::invalid_config("base URL cannot be empty"));
        }
        if self.count == 0 {
            return Err(StarScanError::invalid_config(
                "count must be at least 1 (the catalog rejects count=0)",
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(StarScanError::invalid_config(
                "timeout must be positive; use None to disable",
            ));
        }
        Ok(())
    }
}

/// Builder for [`PipelineConfig`] with validation at build time
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog API key
    #[must_use]
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Set the catalog base URL
    #[must_use]
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the number of catalog items to request
    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.config.count = count;
        self
    }

    /// Set the raw download directory
    #[must_use]
    pub fn save_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.save_dir = dir.into();
        self
    }

    /// Set the annotated output directory
    #[must_use]
    pub fn processed_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.processed_dir = dir.into();
        self
    }

    /// Set detection parameters
    #[must_use]
    pub fn detection(mut self, detection: DetectionParams) -> Self {
        self.config.detection = detection;
        self
    }

    /// Set the per-request timeout in seconds (None disables the timeout)
    #[must_use]
    pub fn timeout_secs(mut self, timeout_secs: Option<u64>) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set the analysis worker count (0 = auto-detect)
    #[must_use]
    pub fn analysis_threads(mut self, threads: usize) -> Self {
        self.config.analysis_threads = threads;
        self
    }

    /// Build the configuration, validating all values
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
