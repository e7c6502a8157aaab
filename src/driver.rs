//! The polling loop: collect, publish, sleep.

use crate::metrics::{CycleReport, ImageCollector};
use crate::publish::Publisher;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Runs collection and publishing on a fixed interval.
///
/// Cycles are strictly sequential; a slow cycle delays the next one instead
/// of overlapping it.
pub struct Driver {
    collector: ImageCollector,
    publisher: Publisher,
    interval: Duration,
}

impl Driver {
    pub fn new(collector: ImageCollector, publisher: Publisher, interval: Duration) -> Self {
        Self {
            collector,
            publisher,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single cycle. Every failure is logged and swallowed.
    ///
    /// Returns the collection report, or `None` when the container listing failed.
    /// The publish step runs either way, so file mode re-renders the prior state.
    pub async fn run_once(&self) -> Option<CycleReport> {
        let report = match self.collector.collect().await {
            Ok(report) => {
                if !report.is_complete() {
                    warn!(
                        listed = report.listed,
                        skipped = report.skipped,
                        "Some containers were left out of this cycle"
                    );
                }
                Some(report)
            }
            Err(e) => {
                error!(error = %e, "Error listing containers");
                None
            }
        };

        if let Err(e) = self.publisher.after_cycle().await {
            error!(error = %e, "Error writing metrics to file");
        }

        report
    }

    /// Run cycles until `shutdown` fires or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<()>) {
        info!(interval = ?self.interval, "Starting collection loop");

        loop {
            if let Some(report) = self.run_once().await {
                debug!(
                    published = report.published,
                    interval = ?self.interval,
                    "Metrics collected, sleeping"
                );
            }

            tokio::select! {
                biased;

                _ = shutdown.changed() => {
                    info!("Shutdown signal received, stopping collection loop");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
