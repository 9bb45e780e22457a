use axum::{routing::get, Router};

pub mod analytics;
pub mod catalog;
pub mod climate;
pub mod system;

/// Router for the versioned data endpoints (mounted under `/api/v1`).
pub fn router() -> Router {
    Router::new()
        .route("/locations", get(catalog::list_locations))
        .route("/metrics", get(catalog::list_metrics))
        .route("/climate", get(climate::query_climate))
        .route("/summary", get(analytics::summary))
        .route("/trends", get(analytics::trends))
}
