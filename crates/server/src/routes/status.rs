//! Health and metrics endpoints

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::SharedResponder;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// GET /health - Check that the clinic store can be read
pub async fn health(State(responder): State<SharedResponder>) -> impl IntoResponse {
    let reason = match tokio::task::spawn_blocking(move || responder.check_store()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Health check store load failed");
            Some(format!("Store load failed: {}", e))
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check task failed");
            Some(format!("Health check task failed: {}", e))
        }
    };

    match reason {
        None => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                reason: None,
            }),
        ),
        Some(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                reason: Some(reason),
            }),
        ),
    }
}

/// GET /metrics - Render request and chat reply counters in Prometheus text format
pub async fn metrics(Extension(handle): Extension<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
