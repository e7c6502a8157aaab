//! Text exposition snapshots written to disk.

use crate::config::metrics_file_in;
use crate::error::{ExporterError, Result};
use crate::metrics::ImageInfoMetrics;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overwrites `<dir>/docker_metrics.prom` with the current gauge vector.
#[derive(Clone)]
pub struct FilePublisher {
    path: PathBuf,
    metrics: ImageInfoMetrics,
}

impl FilePublisher {
    pub fn new(dir: impl AsRef<Path>, metrics: ImageInfoMetrics) -> Self {
        Self {
            path: metrics_file_in(dir.as_ref()),
            metrics,
        }
    }

    /// Target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render and write the snapshot, truncating any previous content.
    pub async fn write(&self) -> Result<()> {
        let shown = self.path.display().to_string();

        let body = self
            .metrics
            .render()
            .map_err(|e| ExporterError::file_write_error(&shown, format!("encode: {e}")))?;

        debug!(file = %shown, "Writing metrics to file");
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| ExporterError::file_write_error(&shown, e.to_string()))?;
        debug!(file = %shown, "Metrics written to file");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ContainerImageRecord;

    fn record(name: &str) -> ContainerImageRecord {
        ContainerImageRecord {
            container_name: name.to_string(),
            image_id: "sha256:abc".to_string(),
            image_repo: "nginx:1.25".to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = ImageInfoMetrics::new().unwrap();
        let publisher = FilePublisher::new(dir.path(), metrics.clone());
        assert_eq!(publisher.path(), dir.path().join("docker_metrics.prom"));

        metrics.set(&record("web-1"));
        publisher.write().await.unwrap();
        let first = std::fs::read_to_string(publisher.path()).unwrap();
        assert!(first.contains(r#"container_name="web-1""#));

        metrics.reset();
        metrics.set(&record("web-2"));
        publisher.write().await.unwrap();
        let second = std::fs::read_to_string(publisher.path()).unwrap();
        assert!(second.contains(r#"container_name="web-2""#));
        assert!(!second.contains(r#"container_name="web-1""#));
    }

    #[tokio::test]
    async fn test_missing_directory_is_file_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = FilePublisher::new(dir.path().join("absent"), ImageInfoMetrics::new().unwrap());

        let err = publisher.write().await.unwrap_err();
        assert!(matches!(err, ExporterError::FileWrite { .. }));
        assert!(!err.is_fatal());
    }
}
