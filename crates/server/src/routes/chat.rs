//! Chat message endpoint

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};

use crate::SharedResponder;
use crate::error::AppError;

/// Request body for chat
#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
}

/// Response body for chat
#[derive(Serialize)]
pub struct ChatResponse {
    reply: String,
}

/// POST /chat - Answer one free-text message
///
/// The responder reads and may rewrite the whole store file, so it runs on
/// the blocking pool.
pub async fn reply(
    State(responder): State<SharedResponder>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(body) = body?;
    tracing::info!(message = %body.message, "Chat request");

    let span = tracing::Span::current();
    let reply =
        tokio::task::spawn_blocking(move || span.in_scope(|| responder.respond(&body.message)))
            .await??;

    Ok(Json(ChatResponse { reply }))
}
