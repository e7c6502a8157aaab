//! Publishing the gauge vector over HTTP or to a file.

pub mod file;

pub use file::FilePublisher;

use crate::config::PublishMode;
use crate::error::Result;
use crate::metrics::ImageInfoMetrics;
use crate::web::{self, WebConfig};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Serves the registry on `/metrics` from an independent task.
#[derive(Clone)]
pub struct HttpPublisher {
    config: WebConfig,
    metrics: ImageInfoMetrics,
}

impl HttpPublisher {
    pub fn new(config: WebConfig, metrics: ImageInfoMetrics) -> Self {
        Self { config, metrics }
    }

    /// Bind the listener and spawn the responder task.
    ///
    /// Binding happens before returning so a busy port fails startup.
    pub async fn start(&self) -> Result<JoinHandle<Result<()>>> {
        let listener = web::bind(&self.config).await?;
        let metrics = self.metrics.clone();

        Ok(tokio::spawn(async move {
            let result = web::serve(listener, metrics).await;
            if let Err(e) = &result {
                error!(error = %e, "Metrics server stopped");
            }
            result
        }))
    }
}

/// The single publish mode active in this process.
#[derive(Clone)]
pub enum Publisher {
    Http(HttpPublisher),
    File(FilePublisher),
}

impl Publisher {
    /// Build the publisher for `mode`, sharing `metrics` with the collector.
    pub fn from_mode(mode: &PublishMode, metrics: ImageInfoMetrics) -> Self {
        match mode {
            PublishMode::Http { host, port } => {
                Self::Http(HttpPublisher::new(WebConfig::new(host.clone(), *port), metrics))
            }
            PublishMode::File { dir } => Self::File(FilePublisher::new(dir, metrics)),
        }
    }

    /// Start background serving. Only HTTP mode has a task to start.
    pub async fn start(&self) -> Result<Option<JoinHandle<Result<()>>>> {
        match self {
            Self::Http(http) => http.start().await.map(Some),
            Self::File(file) => {
                info!(path = %file.path().display(), "Metrics file path specified");
                Ok(None)
            }
        }
    }

    /// Publish step run by the driver after every collection.
    pub async fn after_cycle(&self) -> Result<()> {
        match self {
            Self::Http(_) => Ok(()),
            Self::File(file) => file.write().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_mode_has_no_responder() {
        let dir = tempfile::tempdir().unwrap();
        let mode = PublishMode::File {
            dir: dir.path().to_path_buf(),
        };
        let publisher = Publisher::from_mode(&mode, ImageInfoMetrics::new().unwrap());

        assert!(publisher.start().await.unwrap().is_none());
        publisher.after_cycle().await.unwrap();
        assert!(dir.path().join("docker_metrics.prom").exists());
    }

    #[tokio::test]
    async fn test_http_mode_after_cycle_is_noop() {
        let mode = PublishMode::Http {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let publisher = Publisher::from_mode(&mode, ImageInfoMetrics::new().unwrap());
        assert!(matches!(publisher, Publisher::Http(_)));
        publisher.after_cycle().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_mode_start_spawns_server() {
        let mode = PublishMode::Http {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let publisher = Publisher::from_mode(&mode, ImageInfoMetrics::new().unwrap());
        let handle = publisher.start().await.unwrap().expect("HTTP mode spawns a task");
        assert!(!handle.is_finished());
        handle.abort();
    }
}
