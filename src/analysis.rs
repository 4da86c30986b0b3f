//! Parallel star analysis
//!
//! The analysis stage is CPU bound: each saved image is decoded, scanned for
//! bright blobs, and written back out with detection markers. Jobs run on a
//! rayon pool sized to the configured worker count so decoding and labelling
//! never serialize onto one core. A job that fails reports an error string in
//! place of its summary; it is never dropped and never takes the pool down.

use crate::config::PipelineConfig;
use crate::detector::{annotate_stars, detect_stars, DetectionParams};
use crate::error::{Result, StarScanError};
use crate::progress::ProgressReporter;
use rayon::prelude::*;
use std::path::PathBuf;

/// Analyzer for the CPU-bound fan-out phase
#[derive(Debug, Clone)]
pub struct StarAnalyzer {
    save_dir: PathBuf,
    processed_dir: PathBuf,
    params: DetectionParams,
    threads: usize,
}

impl StarAnalyzer {
    /// Create an analyzer from pipeline configuration
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            save_dir: config.save_dir.clone(),
            processed_dir: config.processed_dir.clone(),
            params: config.detection,
            threads: config.analysis_threads,
        }
    }

    /// Analyze every file, one parallel job each
    ///
    /// Returns exactly one summary string per input filename, in input order.
    /// The progress reporter fires once per completed job, success or
    /// failure, and the method waits for every dispatched job before
    /// returning.
    pub fn analyze_all(
        &self,
        files: &[String],
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<String>> {
        progress.on_stage_start(files.len());

        let run = || {
            files
                .par_iter()
                .map(|filename| {
                    let summary = self.analyze_one(filename);
                    progress.on_item_complete();
                    summary
                })
                .collect::<Vec<String>>()
        };

        let summaries = if self.threads == 0 {
            // Global pool already defaults to one worker per CPU
            run()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| {
                    StarScanError::invalid_config(format!("failed to build analysis pool: {e}"))
                })?;
            pool.install(run)
        };

        progress.on_stage_complete();
        Ok(summaries)
    }

    /// Analyze a single file, converting any failure into an error string
    #[must_use]
    pub fn analyze_one(&self, filename: &str) -> String {
        match self.process_file(filename) {
            Ok(count) => format!("Found {count} stars in {filename}"),
            Err(e) => {
                log::warn!("Analysis failed for {filename}: {e}");
                format!("Error loading {filename}: {e}")
            },
        }
    }

    /// Decode, detect, annotate, and write one image
    fn process_file(&self, filename: &str) -> Result<usize> {
        let input_path = self.save_dir.join(filename);
        let output_path = self.processed_dir.join(format!("detected_{filename}"));

        // Catalog URLs frequently mislabel the payload format, so sniff the
        // content instead of trusting the .jpg extension
        let img = image::ImageReader::open(&input_path)?
            .with_guessed_format()?
            .decode()?;
        let gray = img.to_luma8();

        let stars = detect_stars(&gray, &self.params);

        let annotated = annotate_stars(&img.to_rgb8(), &stars);
        annotated.save(&output_path)?;

        log::debug!(
            "Annotated {} detection(s): {} -> {}",
            stars.len(),
            input_path.display(),
            output_path.display()
        );
        Ok(stars.len())
    }
}
