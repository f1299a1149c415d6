//! HTTP endpoint layer for AwesomeFacts.
//!
//! # Responsibility
//! - Map HTTP verbs and paths onto `FactService` calls.
//! - Translate not-found outcomes and storage faults into status codes.
//!
//! # Invariants
//! - Drafts are validated here; the core never re-validates them.
//! - Response bodies use the camelCase fact shape of the core model.

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use handlers::{HealthBody, FACTS_BASE_PATH};
pub use state::AppState;

use awesomefacts_core::{FactRepository, FactService};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;
use std::time::Instant;

/// Builds the application router around a ready service.
pub fn router<R>(service: FactService<R>) -> Router
where
    R: FactRepository + Send + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            FACTS_BASE_PATH,
            get(handlers::list_facts::<R>).post(handlers::create_fact::<R>),
        )
        .route(
            &format!("{FACTS_BASE_PATH}/:id"),
            get(handlers::get_fact::<R>)
                .put(handlers::update_fact::<R>)
                .delete(handlers::delete_fact::<R>),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(AppState::new(service))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=api status={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        method,
        path,
        started_at.elapsed().as_millis()
    );
    response
}
