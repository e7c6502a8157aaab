//! HTTP handlers for the metrics endpoint.

use crate::metrics::ImageInfoMetrics;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

/// Render the current gauge vector in the text exposition format.
pub async fn metrics(State(metrics): State<ImageInfoMetrics>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, metrics.format_type())], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics").into_response()
        }
    }
}

/// Health check endpoint.
pub async fn health_check(State(metrics): State<ImageInfoMetrics>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "containers": metrics.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_container_count() {
        let Json(body) = health_check(State(ImageInfoMetrics::new().unwrap())).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["containers"], 0);
    }

    #[tokio::test]
    async fn test_empty_registry_renders_ok() {
        let response = metrics(State(ImageInfoMetrics::new().unwrap())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
