//! HTTP adapter for chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatRequest, ChatResponse, ErrorDetail, FailureResponse, HistoryResponse,
    RegistrationPayload, RegistrationProgressResponse, ResponseStatus, SearchPayload,
    TurnResponse, ValidChatRequest,
};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
