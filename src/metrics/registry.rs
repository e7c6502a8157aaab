//! Owned Prometheus registry holding the container image info gauge.

use crate::error::Result;
use crate::metrics::data::ContainerImageRecord;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

/// Name of the published gauge family.
pub const METRIC_NAME: &str = "docker_container_image_info";

/// Help text of the published gauge family.
pub const METRIC_HELP: &str = "Docker container image information";

/// Gauge labels, in the order [`ContainerImageRecord::label_values`] yields them.
pub const LABEL_NAMES: [&str; 3] = ["container_name", "image_id", "image_repo"];

/// Registry and gauge vector shared by the collector and the publishers.
///
/// Clones are handles onto the same registry. The gauge vector does its own
/// locking, so a scrape may run concurrently with a collection cycle.
#[derive(Clone)]
pub struct ImageInfoMetrics {
    registry: Registry,
    image_info: GaugeVec,
}

impl ImageInfoMetrics {
    /// Create a fresh registry with the image info gauge registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let image_info = GaugeVec::new(Opts::new(METRIC_NAME, METRIC_HELP), &LABEL_NAMES)?;
        registry.register(Box::new(image_info.clone()))?;

        Ok(Self {
            registry,
            image_info,
        })
    }

    /// Drop every label combination.
    pub fn reset(&self) {
        self.image_info.reset();
    }

    /// Publish `record` with value `1`.
    pub fn set(&self, record: &ContainerImageRecord) {
        self.image_info
            .with_label_values(&record.label_values())
            .set(1.0);
    }

    /// Render the registry in the text exposition format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Content type of [`render`](Self::render) output.
    pub fn format_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    /// Label combinations currently present with their values, sorted by labels.
    pub fn samples(&self) -> Vec<(ContainerImageRecord, f64)> {
        let mut samples: Vec<_> = self
            .registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == METRIC_NAME)
            .flat_map(|family| family.get_metric().iter())
            .map(|metric| {
                let label = |name: &str| {
                    metric
                        .get_label()
                        .iter()
                        .find(|pair| pair.get_name() == name)
                        .map(|pair| pair.get_value().to_string())
                        .unwrap_or_default()
                };
                let record = ContainerImageRecord {
                    container_name: label(LABEL_NAMES[0]),
                    image_id: label(LABEL_NAMES[1]),
                    image_repo: label(LABEL_NAMES[2]),
                };
                (record, metric.get_gauge().get_value())
            })
            .collect();

        samples.sort_by(|a, b| a.0.cmp(&b.0));
        samples
    }

    /// Label combinations currently present, sorted.
    pub fn records(&self) -> Vec<ContainerImageRecord> {
        self.samples().into_iter().map(|(record, _)| record).collect()
    }

    /// Number of label combinations currently present.
    pub fn len(&self) -> usize {
        self.samples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, repo: &str) -> ContainerImageRecord {
        ContainerImageRecord {
            container_name: name.to_string(),
            image_id: "sha256:abc".to_string(),
            image_repo: repo.to_string(),
        }
    }

    #[test]
    fn test_set_publishes_value_one() {
        let metrics = ImageInfoMetrics::new().unwrap();
        metrics.set(&record("web-1", "nginx:1.25"));

        let samples = metrics.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].0, record("web-1", "nginx:1.25"));
        assert_eq!(samples[0].1, 1.0);
    }

    #[test]
    fn test_set_is_idempotent() {
        let metrics = ImageInfoMetrics::new().unwrap();
        metrics.set(&record("web-1", "nginx:1.25"));
        metrics.set(&record("web-1", "nginx:1.25"));
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn test_reset_clears_all_entries() {
        let metrics = ImageInfoMetrics::new().unwrap();
        metrics.set(&record("web-1", "nginx:1.25"));
        metrics.set(&record("db-1", "postgres:16"));
        assert_eq!(metrics.len(), 2);

        metrics.reset();
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_render_text_format() {
        let metrics = ImageInfoMetrics::new().unwrap();
        metrics.set(&record("web-1", "nginx:1.25"));

        let text = metrics.render().unwrap();
        assert!(text.contains("# HELP docker_container_image_info Docker container image information"));
        assert!(text.contains("# TYPE docker_container_image_info gauge"));
        assert!(text.contains(
            r#"docker_container_image_info{container_name="web-1",image_id="sha256:abc",image_repo="nginx:1.25"} 1"#
        ));
        assert!(metrics.format_type().starts_with("text/plain"));
    }

    #[test]
    fn test_clones_share_state() {
        let metrics = ImageInfoMetrics::new().unwrap();
        let handle = metrics.clone();
        metrics.set(&record("web-1", "nginx:1.25"));
        assert_eq!(handle.len(), 1);
    }
}
