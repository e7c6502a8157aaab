//! Error handling for the image exporter.

/// A specialized `Result` type for exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// The main error type for exporter operations.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// The container runtime client could not be constructed
    #[error("Failed to connect to container runtime: {0}")]
    RuntimeConnect(String),

    /// Listing containers failed
    #[error("Failed to query container runtime: {0}")]
    RuntimeQuery(String),

    /// Inspecting a single container's image failed
    #[error("Failed to inspect image {image} for container {container}: {reason}")]
    ImageInspect {
        container: String,
        image: String,
        reason: String,
    },

    /// Writing the metrics file failed
    #[error("Failed to write metrics file {path}: {reason}")]
    FileWrite { path: String, reason: String },

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Metric registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExporterError {
    /// Create a new runtime connection error
    pub fn runtime_connect_error(msg: impl Into<String>) -> Self {
        Self::RuntimeConnect(msg.into())
    }

    /// Create a new runtime query error
    pub fn runtime_query_error(msg: impl Into<String>) -> Self {
        Self::RuntimeQuery(msg.into())
    }

    /// Create a new image inspection error
    pub fn image_inspect_error(
        container: impl Into<String>,
        image: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ImageInspect {
            container: container.into(),
            image: image.into(),
            reason: reason.into(),
        }
    }

    /// Create a new metrics file write error
    pub fn file_write_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileWrite {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error should terminate the process rather than the cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RuntimeConnect(_) | Self::WebServer(_) | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = ExporterError::image_inspect_error("/web-1", "nginx", "no such image");
        let msg = err.to_string();
        assert!(msg.contains("/web-1"));
        assert!(msg.contains("nginx"));
        assert!(msg.contains("no such image"));

        let err = ExporterError::file_write_error("/tmp/m/docker_metrics.prom", "read-only");
        assert!(err.to_string().contains("/tmp/m/docker_metrics.prom"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ExporterError::web_server_error("bind").is_fatal());
        assert!(ExporterError::runtime_connect_error("socket").is_fatal());
        assert!(!ExporterError::runtime_query_error("timeout").is_fatal());
        assert!(!ExporterError::file_write_error("p", "r").is_fatal());
        assert!(!ExporterError::image_inspect_error("c", "i", "r").is_fatal());
    }
}
