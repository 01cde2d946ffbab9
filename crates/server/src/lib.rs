//! clinic-server library crate
//!
//! Exposes `build_responder`, `build_app` and `config` for the binary and
//! integration tests. The actual binary entrypoint is in `main.rs`.

pub mod chat;
pub mod config;
pub mod db;
mod error;
mod middleware;
pub mod repl;
mod routes;

use std::sync::{Arc, OnceLock};

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use clinic_core::{ClinicError, IntentCorpus};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use chat::Responder;
use config::Config;
use db::JsonFileRepository;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Responder shared by all request handlers
pub type SharedResponder = Arc<Responder>;

/// Build the responder described by the configuration: JSON file store,
/// built-in or file intent corpus, optionally seeded reply selection.
pub fn build_responder(config: &Config) -> Result<Responder, ClinicError> {
    let corpus = match &config.intents_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading intent corpus");
            IntentCorpus::from_path(path)?
        }
        None => IntentCorpus::builtin()?,
    };
    tracing::info!(intents = corpus.intents.len(), "Intent corpus ready");

    let repo = Arc::new(JsonFileRepository::new(config.db_path.clone()));
    let responder = Responder::new(repo, corpus);

    Ok(match config.response_seed {
        Some(seed) => responder.with_seed(seed),
        None => responder,
    })
}

/// Handle of the process-wide Prometheus recorder.
///
/// The recorder is installed on first use; every router built afterwards
/// renders the same registry.
fn prometheus_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("Metrics recorder already installed");
            }
            handle
        })
        .clone()
}

/// Build the full application router with all routes and middleware.
///
/// Kept out of `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(responder: SharedResponder, config: &Config) -> Router {
    let prometheus_handle = prometheus_handle();

    let status_routes = Router::new()
        .route("/health", get(routes::status::health))
        .route("/metrics", get(routes::status::metrics))
        .layer(Extension(prometheus_handle));

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::chat_routes())
        .merge(status_routes)
        .route_layer(axum_mw::from_fn(middleware::metrics_middleware))
        .with_state(responder)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
