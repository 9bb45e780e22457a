//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: store selection and shared handler state
//! - `routes/`: HTTP routes + handlers (one file per API area)
//! - `dto.rs`: query-string parsing and response envelopes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    // The dashboard is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", routes::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
