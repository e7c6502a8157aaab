//! Web application router and middleware setup.

use crate::metrics::ImageInfoMetrics;
use crate::web::handlers;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the axum application serving `/metrics` and `/health`.
pub fn create_app(metrics: ImageInfoMetrics) -> Router {
    Router::new()
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(metrics)
}
