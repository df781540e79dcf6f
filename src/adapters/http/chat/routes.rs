//! HTTP routes for chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_history, get_registration, post_chat, ChatHandlers};

/// Creates the chat router with all endpoints.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/chat", post(post_chat))
        .route("/sessions/:session_id/history", get(get_history))
        .route("/sessions/:session_id/registration", get(get_registration))
        .with_state(handlers)
}
