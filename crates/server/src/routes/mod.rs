mod chat;
pub mod status;

use axum::{Router, routing::post};

use crate::SharedResponder;

/// Build chat routes
pub fn chat_routes() -> Router<SharedResponder> {
    Router::new().route("/chat", post(chat::reply))
}
