//! Docker Engine API implementation of [`RuntimeClient`].

use crate::error::{ExporterError, Result};
use crate::metrics::data::{ContainerEntry, ImageDetails};
use crate::metrics::traits::RuntimeClient;
use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::models::{ContainerSummary, ImageInspect};
use bollard::Docker;
use tracing::{debug, warn};

/// Runtime client backed by the local Docker daemon.
#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using `DOCKER_HOST` (`unix://`, `tcp://` or `http://`), else the
    /// local socket, and negotiate the API version with the daemon.
    ///
    /// An unsupported `DOCKER_HOST` scheme is a connect error. An unreachable
    /// daemon is not; it surfaces on the first listing.
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_defaults()
            .map_err(|e| ExporterError::runtime_connect_error(e.to_string()))?;
        let docker = match docker.clone().negotiate_version().await {
            Ok(negotiated) => negotiated,
            Err(e) => {
                warn!(error = %e, "API version negotiation failed, using client default");
                docker
            }
        };

        debug!(api_version = %docker.client_version(), "Docker client created");
        Ok(Self { docker })
    }

    /// Wrap an existing client.
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

#[async_trait]
impl RuntimeClient for DockerRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerEntry>> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String>::default()))
            .await
            .map_err(|e| ExporterError::runtime_query_error(e.to_string()))?;

        Ok(containers.into_iter().map(container_entry).collect())
    }

    async fn inspect_image(&self, reference: &str) -> Result<ImageDetails> {
        let image = self
            .docker
            .inspect_image(reference)
            .await
            .map_err(|e| ExporterError::runtime_query_error(e.to_string()))?;

        Ok(image_details(image))
    }

    async fn ping(&self) -> Result<()> {
        self.docker
            .ping()
            .await
            .map(|_| ())
            .map_err(|e| ExporterError::runtime_query_error(e.to_string()))
    }
}

fn container_entry(summary: ContainerSummary) -> ContainerEntry {
    ContainerEntry {
        id: summary.id.unwrap_or_default(),
        names: summary.names.unwrap_or_default(),
        image: summary.image.unwrap_or_default(),
        image_id: summary.image_id.unwrap_or_default(),
    }
}

fn image_details(image: ImageInspect) -> ImageDetails {
    ImageDetails {
        id: image.id.unwrap_or_default(),
        repo_tags: image.repo_tags.unwrap_or_default(),
    }
}
