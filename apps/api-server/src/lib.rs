//! Maintenance task API server.
//!
//! Serves create, list, fetch, update and delete operations for maintenance
//! tasks under `/api`, backed by any [`TaskStore`].

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
    routing::get,
};
use task_store::TaskStore;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::state::{AppState, create_shared_state};

/// Creates the application router with all routes configured.
pub fn create_app<S: TaskStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest("/api", api::create_router::<S>())
        .route("/health", get(api::health_check))
        .with_state(state);

    with_security_headers(router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Adds hardening headers to every response that does not already set them.
fn with_security_headers(router: Router) -> Router {
    [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
        (header::X_DNS_PREFETCH_CONTROL, "off"),
        (header::REFERRER_POLICY, "no-referrer"),
        (
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=15552000; includeSubDomains",
        ),
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            "same-origin",
        ),
        (
            HeaderName::from_static("x-permitted-cross-domain-policies"),
            "none",
        ),
    ]
    .into_iter()
    .fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ))
    })
}

/// Creates the application state around the given store.
pub fn create_state<S: TaskStore>(store: S) -> Arc<AppState<S>> {
    create_shared_state(store)
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
