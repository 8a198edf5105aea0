//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: data source, assistant, workers and the SSE channel
//! - `routes/`: HTTP routes + handlers (one file per dashboard area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent `{ error, message }` responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use bizlens_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(build_router(config.jwt_secret.as_bytes(), Arc::new(services)))
}

/// Router over already-built services.
pub fn build_router(jwt_secret: &[u8], services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState::hs256(jwt_secret);

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
