//! Container image collection: list, inspect, reset, repopulate.

use crate::error::{ExporterError, Result};
use crate::metrics::data::{ContainerEntry, ContainerImageRecord, CycleReport};
use crate::metrics::registry::ImageInfoMetrics;
use crate::metrics::traits::RuntimeClient;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Mirrors the runtime's container list into the image info gauge.
#[derive(Clone)]
pub struct ImageCollector {
    runtime: Arc<dyn RuntimeClient>,
    metrics: ImageInfoMetrics,
}

impl ImageCollector {
    /// Create a collector that publishes into `metrics`.
    pub fn new(runtime: Arc<dyn RuntimeClient>, metrics: ImageInfoMetrics) -> Self {
        Self { runtime, metrics }
    }

    /// The metrics handle this collector writes to.
    pub fn metrics(&self) -> &ImageInfoMetrics {
        &self.metrics
    }

    /// Run one collection cycle.
    ///
    /// A listing failure abandons the cycle before the gauge is touched.
    /// Otherwise the gauge is reset and refilled with one entry per container
    /// whose image could be inspected; inspection failures only drop that container.
    pub async fn collect(&self) -> Result<CycleReport> {
        let containers = self.runtime.list_containers().await?;
        let mut report = CycleReport::new(containers.len());

        self.metrics.reset();

        for container in &containers {
            match self.record_for(container).await {
                Ok(Some(record)) => {
                    debug!(
                        container_name = %record.container_name,
                        image_id = %record.image_id,
                        image_repo = %record.image_repo,
                        "Publishing container image"
                    );
                    self.metrics.set(&record);
                    report.published += 1;
                }
                Ok(None) => {
                    warn!(container_id = %container.id, "Container has no name, skipping");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(
                        container_name = container.primary_name().unwrap_or_default(),
                        image = %container.image,
                        error = %e,
                        "Error inspecting image for container"
                    );
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Derive the records for the current container list without touching the gauge.
    ///
    /// Containers that cannot be inspected are logged and left out.
    pub async fn snapshot(&self) -> Result<Vec<ContainerImageRecord>> {
        let containers = self.runtime.list_containers().await?;
        let mut records = Vec::with_capacity(containers.len());

        for container in &containers {
            match self.record_for(container).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => warn!(container_id = %container.id, "Container has no name, skipping"),
                Err(e) => error!(
                    container_name = container.primary_name().unwrap_or_default(),
                    image = %container.image,
                    error = %e,
                    "Error inspecting image for container"
                ),
            }
        }

        records.sort();
        Ok(records)
    }

    async fn record_for(&self, container: &ContainerEntry) -> Result<Option<ContainerImageRecord>> {
        let Some(name) = container.primary_name() else {
            return Ok(None);
        };

        let image = self
            .runtime
            .inspect_image(&container.image)
            .await
            .map_err(|e| {
                let reason = match e {
                    ExporterError::RuntimeQuery(reason) => reason,
                    other => other.to_string(),
                };
                ExporterError::image_inspect_error(name, &container.image, reason)
            })?;

        Ok(ContainerImageRecord::derive(container, &image))
    }
}
