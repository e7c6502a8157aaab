//! Traits for talking to the container runtime.

use crate::error::Result;
use crate::metrics::data::{ContainerEntry, ImageDetails};
use async_trait::async_trait;

/// Read-only access to a container runtime's management API.
///
/// Implementations report every runtime failure as `ExporterError::RuntimeQuery`;
/// the collector attaches container context to inspection failures.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// List containers using the runtime's default listing options.
    async fn list_containers(&self) -> Result<Vec<ContainerEntry>>;

    /// Inspect the image behind `reference` (an id or `repository:tag`).
    async fn inspect_image(&self, reference: &str) -> Result<ImageDetails>;

    /// Check that the runtime is reachable.
    async fn ping(&self) -> Result<()>;
}
