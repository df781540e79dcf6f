//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::kv::{KvConversationStore, KvRegistrationStore, KvSpaceRepository};
use crate::application::handlers::{
    AdvanceRegistrationHandler, GetHistoryHandler, GetHistoryQuery,
    GetRegistrationProgressHandler, GetRegistrationProgressQuery, HandleMessageCommand,
    HandleMessageHandler, SearchSpacesHandler,
};
use crate::application::services::{FieldExtractor, IntentClassifier, ResponseSynthesizer};
use crate::domain::foundation::SessionId;
use crate::ports::{AIProvider, KeyValueStore, StoreError};

use super::dto::{
    ChatRequest, ChatResponse, FailureResponse, HistoryResponse, RegistrationProgressResponse,
    ResponseStatus,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    message_handler: Arc<HandleMessageHandler>,
    history_handler: Arc<GetHistoryHandler>,
    progress_handler: Arc<GetRegistrationProgressHandler>,
}

impl ChatHandlers {
    pub fn new(
        message_handler: Arc<HandleMessageHandler>,
        history_handler: Arc<GetHistoryHandler>,
        progress_handler: Arc<GetRegistrationProgressHandler>,
    ) -> Self {
        Self {
            message_handler,
            history_handler,
            progress_handler,
        }
    }

    /// Wires every handler over one gateway and one key-value store.
    pub fn from_ports(ai_provider: Arc<dyn AIProvider>, kv: Arc<dyn KeyValueStore>) -> Self {
        let conversations = Arc::new(KvConversationStore::new(kv.clone()));
        let registrations = Arc::new(KvRegistrationStore::new(kv.clone()));
        let spaces = Arc::new(KvSpaceRepository::new(kv));
        let synthesizer = Arc::new(ResponseSynthesizer::new(ai_provider.clone()));

        let message_handler = HandleMessageHandler::new(
            conversations.clone(),
            IntentClassifier::new(ai_provider.clone()),
            SearchSpacesHandler::new(spaces.clone(), synthesizer.clone()),
            AdvanceRegistrationHandler::new(
                registrations.clone(),
                spaces,
                FieldExtractor::new(ai_provider),
                synthesizer.clone(),
            ),
            synthesizer,
        );

        Self::new(
            Arc::new(message_handler),
            Arc::new(GetHistoryHandler::new(conversations)),
            Arc::new(GetRegistrationProgressHandler::new(registrations)),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Route one message through the engine
pub async fn post_chat(
    State(handlers): State<ChatHandlers>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "chat request body rejected");
            return bad_request(FailureResponse::single("request body must be a JSON object"));
        }
    };

    let request = match request.validate() {
        Ok(request) => request,
        Err(failure) => return bad_request(failure),
    };

    let session_id = match SessionId::new(request.session_id) {
        Ok(id) => id,
        Err(e) => return bad_request(FailureResponse::single(e.to_string())),
    };

    let cmd = HandleMessageCommand {
        session_id: session_id.clone(),
        message: request.message,
    };

    let result = handlers.message_handler.handle(cmd).await;
    let response = ChatResponse::from_result(session_id.to_string(), result);
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/sessions/:session_id/history - Stored turns of a session
pub async fn get_history(
    State(handlers): State<ChatHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(e) => return bad_request(FailureResponse::single(e.to_string())),
    };

    let query = GetHistoryQuery {
        session_id: session_id.clone(),
    };

    match handlers.history_handler.handle(query).await {
        Ok(turns) => {
            let response = HistoryResponse::new(session_id.to_string(), turns);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_store_error(&session_id, e),
    }
}

/// GET /api/sessions/:session_id/registration - Active registration progress
pub async fn get_registration(
    State(handlers): State<ChatHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(e) => return bad_request(FailureResponse::single(e.to_string())),
    };

    let query = GetRegistrationProgressQuery {
        session_id: session_id.clone(),
    };

    match handlers.progress_handler.handle(query).await {
        Ok(registration) => {
            let response = RegistrationProgressResponse {
                status: ResponseStatus::Success,
                session_id: session_id.to_string(),
                registration,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_store_error(&session_id, e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn bad_request(failure: FailureResponse) -> Response {
    (StatusCode::BAD_REQUEST, Json(failure)).into_response()
}

fn handle_store_error(session_id: &SessionId, error: StoreError) -> Response {
    tracing::warn!(session_id = %session_id, error = %error, "session query failed");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(FailureResponse::single("session storage is unavailable")),
    )
        .into_response()
}
