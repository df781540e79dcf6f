//! HandleMessageHandler - routes one inbound message through the engine.
//!
//! 1. Append the user turn
//! 2. Classify against the turns that preceded it
//! 3. Dispatch to search, registration or profile creation
//! 4. Append the assistant turn with its intent and metadata
//!
//! Nothing here returns an error. Store and gateway failures are logged and
//! folded into the reply.

use std::sync::Arc;

use crate::application::handlers::registration::{
    AdvanceRegistrationCommand, AdvanceRegistrationHandler, AdvanceRegistrationResult,
};
use crate::application::handlers::search::{
    SearchSpacesCommand, SearchSpacesHandler, SearchSpacesResult,
};
use crate::application::services::{CallContext, IntentClassifier, ReplyKind, ResponseSynthesizer};
use crate::domain::conversation::{Turn, TurnMetadata};
use crate::domain::foundation::SessionId;
use crate::domain::intent::Intent;
use crate::ports::ConversationStore;

/// Command for one inbound message.
#[derive(Debug, Clone)]
pub struct HandleMessageCommand {
    pub session_id: SessionId,
    pub message: String,
}

/// Structured data produced alongside the reply.
#[derive(Debug, Clone)]
pub enum ReplyPayload {
    Search(SearchSpacesResult),
    Registration(AdvanceRegistrationResult),
    Profile,
}

/// Reply to one inbound message.
#[derive(Debug, Clone)]
pub struct HandleMessageResult {
    pub intent: Intent,
    pub reply: String,
    pub payload: ReplyPayload,
}

/// Handler wiring classification and the per-intent flows.
pub struct HandleMessageHandler {
    conversations: Arc<dyn ConversationStore>,
    classifier: IntentClassifier,
    search: SearchSpacesHandler,
    registration: AdvanceRegistrationHandler,
    synthesizer: Arc<ResponseSynthesizer>,
}

impl HandleMessageHandler {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        classifier: IntentClassifier,
        search: SearchSpacesHandler,
        registration: AdvanceRegistrationHandler,
        synthesizer: Arc<ResponseSynthesizer>,
    ) -> Self {
        Self {
            conversations,
            classifier,
            search,
            registration,
            synthesizer,
        }
    }

    pub async fn handle(&self, cmd: HandleMessageCommand) -> HandleMessageResult {
        let call = CallContext::with_new_trace(cmd.session_id.clone());

        // 1. Record the user turn; history is only context, so a failure is not fatal
        let context = match self
            .conversations
            .append(&cmd.session_id, Turn::user(cmd.message.clone()))
            .await
        {
            Ok(conversation) => conversation.context_before_latest().to_vec(),
            Err(err) => {
                tracing::warn!(
                    session_id = %cmd.session_id,
                    error = %err,
                    "user turn could not be stored, continuing without context"
                );
                Vec::new()
            }
        };

        // 2. Classify
        let intent = self.classifier.classify(&cmd.message, &context, &call).await;
        tracing::info!(session_id = %cmd.session_id, trace_id = %call.trace_id, %intent, "routing message");

        // 3. Dispatch
        let (reply, payload, metadata) = match intent {
            Intent::AddSpace => {
                let result = self
                    .registration
                    .handle(
                        AdvanceRegistrationCommand { message: cmd.message.clone() },
                        &context,
                        &call,
                    )
                    .await;
                let metadata = result.metadata();
                (result.reply.clone(), ReplyPayload::Registration(result), metadata)
            }
            Intent::SearchSpace => {
                let result = self
                    .search
                    .handle(SearchSpacesCommand { message: cmd.message.clone() }, &context, &call)
                    .await;
                let metadata = Some(result.metadata());
                (result.reply.clone(), ReplyPayload::Search(result), metadata)
            }
            Intent::CreateUserProfile => {
                let reply = self
                    .synthesizer
                    .synthesize(ReplyKind::ProfileCreation { message: &cmd.message }, &context, &call)
                    .await;
                (reply, ReplyPayload::Profile, None)
            }
        };

        // 4. Record the assistant turn
        self.record_reply(&cmd.session_id, &reply, intent, metadata).await;

        HandleMessageResult {
            intent,
            reply,
            payload,
        }
    }

    async fn record_reply(
        &self,
        session_id: &SessionId,
        reply: &str,
        intent: Intent,
        metadata: Option<TurnMetadata>,
    ) {
        let mut turn = Turn::assistant(reply).with_intent(intent);
        if let Some(metadata) = metadata {
            turn = turn.with_metadata(metadata);
        }

        if let Err(err) = self.conversations.append(session_id, turn).await {
            tracing::warn!(session_id = %session_id, error = %err, "assistant turn could not be stored");
        }
    }
}
