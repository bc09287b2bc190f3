//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the shop service, the suggester, and the realtime channel
//! - `routes/`: HTTP routes + handlers (one file per dashboard area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, BuildError};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Result<Router, BuildError> {
    let services = AppServices::from_config(config)?;
    Ok(router_with(services))
}

/// Router over already-built services; tests use this to inject stores and model clients.
pub fn router_with(services: AppServices) -> Router {
    routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(
            ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_logging)),
        )
}
