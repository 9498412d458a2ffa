//! Progress reporting
//!
//! The pipeline reports through the [`Progress`] trait; [`BarProgress`] draws
//! an indicatif bar on stderr and [`SilentProgress`] only logs.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Sink for generation progress
pub trait Progress: Send + Sync {
    fn set_total(&self, total: u64);
    fn advance(&self, delta: u64);
    fn start(&self) -> Result<()>;
    fn finish(&self) -> Result<()>;
}

/// Terminal progress bar
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for BarProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
    }

    fn advance(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn start(&self) -> Result<()> {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} tables {msg}")
            .map_err(|e| Error::Progress(e.to_string()))?
            .progress_chars("=> ");

        self.bar.set_style(style);
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.reset();
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        self.bar.finish_with_message("done");
        Ok(())
    }
}

/// Progress that only emits log events
#[derive(Debug, Default)]
pub struct SilentProgress {
    total: AtomicU64,
    position: AtomicU64,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }
}

impl Progress for SilentProgress {
    fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
    }

    fn advance(&self, delta: u64) {
        let position = self.position.fetch_add(delta, Ordering::Relaxed) + delta;
        tracing::debug!(position, total = self.total.load(Ordering::Relaxed), "Progress");
    }

    fn start(&self) -> Result<()> {
        self.position.store(0, Ordering::Relaxed);
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        tracing::debug!(position = self.position(), "Progress finished");
        Ok(())
    }
}
