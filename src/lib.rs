//! # Image Exporter - Docker Container Image Metrics
//!
//! Polls the local Docker daemon on a fixed interval and republishes the
//! image each running container was started from as a Prometheus gauge,
//! `docker_container_image_info{container_name, image_id, image_repo} 1`.
//!
//! ## Features
//!
//! - **Stale-free gauge**: the label set is reset and rebuilt every cycle
//! - **Partial failure isolation**: one uninspectable image never drops the others
//! - **Two publish modes**: pull-based `/metrics` endpoint, or a text file
//!   rewritten every cycle for node-exporter style textfile collection
//! - **Library + Binary**: use as a crate or standalone application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use image_exporter::{DockerRuntime, Driver, ImageCollector, ImageInfoMetrics, Publisher, PublishMode};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let metrics = ImageInfoMetrics::new()?;
//!     let runtime = Arc::new(DockerRuntime::connect().await?);
//!     let collector = ImageCollector::new(runtime, metrics.clone());
//!
//!     let publisher = Publisher::from_mode(&PublishMode::default(), metrics);
//!     publisher.start().await?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());
//!     Driver::new(collector, publisher, image_exporter::DEFAULT_INTERVAL)
//!         .run(shutdown_rx)
//!         .await;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod publish;
pub mod web;

// Re-export public API
pub use config::{ExporterConfig, PublishMode};
pub use driver::Driver;
pub use error::{ExporterError, Result};
pub use metrics::{
    collector::ImageCollector,
    data::{ContainerEntry, ContainerImageRecord, CycleReport, ImageDetails},
    docker::DockerRuntime,
    registry::ImageInfoMetrics,
    traits::RuntimeClient,
};
pub use publish::{FilePublisher, HttpPublisher, Publisher};
pub use web::WebConfig;

/// The default collection interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// The default metrics port
pub const DEFAULT_PORT: u16 = 8000;

/// The default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";
