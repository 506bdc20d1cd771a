//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repositories, login tokens and open audit sessions
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON views
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use stocktake_infra::RepositoryError;
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Result<Router, RepositoryError> {
    let services = Arc::new(services::build_services(config)?);

    // Protected routes: require a bearer token from `/login`.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        services.clone(),
        middleware::auth_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .route("/login", post(routes::system::login))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services))))
}
