//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and service construction
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use sims_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config)
        .await
        .context("failed to initialise services")?;
    let session_state = middleware::SessionState {
        gate: services.gate.clone(),
    };

    let origin: HeaderValue = config
        .frontend_origin
        .parse()
        .with_context(|| format!("invalid frontend origin {:?}", config.frontend_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // Protected routes: require a live session.
    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        session_state,
        middleware::session_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/login", post(routes::auth::login))
        .route("/api/auth/check", get(routes::auth::check))
        .merge(protected)
        .layer(Extension(Arc::new(services)))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        ))
}
