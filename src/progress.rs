//! Progress reporting for pipeline stages
//!
//! Both stages report through the same trait so frontends can plug in their
//! own handling; the library never draws progress bars itself.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress reporting trait shared by the download and analysis stages
///
/// Implementations must tolerate concurrent `on_item_complete` calls: the
/// download stage invokes it from interleaved async tasks and the analysis
/// stage from parallel workers. Each completed unit of work triggers exactly
/// one call, success or failure.
pub trait ProgressReporter: Send + Sync {
    /// Called once when a stage starts, with the total number of items
    /// (zero is valid)
    fn on_stage_start(&self, total: usize);

    /// Called exactly once per completed item, regardless of outcome
    fn on_item_complete(&self);

    /// Called once when every item of the stage has resolved
    fn on_stage_complete(&self);
}

/// No-operation progress reporter that does nothing
#[derive(Debug, Default)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    /// Create a new no-op progress reporter
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NoOpProgressReporter {
    fn on_stage_start(&self, _total: usize) {}
    fn on_item_complete(&self) {}
    fn on_stage_complete(&self) {}
}

/// Progress reporter that counts completions atomically
///
/// Used by tests to assert the exactly-one-increment-per-item property, and
/// usable anywhere a caller wants counts without console output.
#[derive(Debug, Default)]
pub struct CountingProgressReporter {
    total: AtomicUsize,
    completed: AtomicUsize,
}

impl CountingProgressReporter {
    /// Create a new counting progress reporter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items completed so far
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Total announced at stage start
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl ProgressReporter for CountingProgressReporter {
    fn on_stage_start(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.completed.store(0, Ordering::SeqCst);
    }

    fn on_item_complete(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stage_complete(&self) {}
}

/// Progress reporter backed by an `indicatif` bar
#[cfg(feature = "cli")]
#[derive(Debug)]
pub struct BarProgressReporter {
    bar: indicatif::ProgressBar,
}

#[cfg(feature = "cli")]
impl BarProgressReporter {
    /// Create a bar reporter with the given stage label and unit
    #[must_use]
    pub fn new(label: &str, unit: &str) -> Self {
        let bar = indicatif::ProgressBar::hidden();
        bar.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {prefix}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());
        bar.set_prefix(unit.to_string());
        Self { bar }
    }
}

#[cfg(feature = "cli")]
impl ProgressReporter for BarProgressReporter {
    fn on_stage_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn on_item_complete(&self) {
        self.bar.inc(1);
    }

    fn on_stage_complete(&self) {
        self.bar.finish();
    }
}
