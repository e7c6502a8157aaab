//! Container image metrics collection and data structures.
//!
//! This module talks to the container runtime, derives one label set per
//! running container and keeps the `docker_container_image_info` gauge in
//! step with the runtime's container list.

pub mod collector;
pub mod data;
pub mod docker;
pub mod registry;
pub mod traits;

// Re-export commonly used items
pub use collector::ImageCollector;
pub use data::{ContainerEntry, ContainerImageRecord, CycleReport, ImageDetails};
pub use docker::DockerRuntime;
pub use registry::ImageInfoMetrics;
pub use traits::RuntimeClient;
