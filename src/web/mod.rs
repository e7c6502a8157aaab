//! HTTP metrics endpoint.
//!
//! Serves the image info gauge in the pull-based text exposition format at
//! `/metrics`, plus a small JSON `/health` endpoint.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{ExporterError, Result};
use crate::metrics::ImageInfoMetrics;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the metrics listener. Failing here is fatal for the process.
pub async fn bind(config: &WebConfig) -> Result<TcpListener> {
    let addr = config.bind_address();
    TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Failed to bind to {addr}: {e}")))
}

/// Serve the metrics endpoint on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, metrics: ImageInfoMetrics) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Starting Prometheus metrics server");
        info!("Metrics endpoint: http://{}/metrics", addr);
    }

    axum::serve(listener, create_app(metrics))
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Server error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_reports_address_in_use() {
        let taken = bind(&WebConfig::new("127.0.0.1", 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = bind(&WebConfig::new("127.0.0.1", port)).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains(&port.to_string()));
    }
}
