//! Intent classification through the text-completion gateway.
//!
//! Fail-open: a gateway failure or an answer naming no known label yields
//! `SEARCH_SPACE`. Callers never see an error.

use std::sync::Arc;

use crate::domain::conversation::{render_transcript, Turn};
use crate::domain::intent::{parse_intent_label, Intent};
use crate::ports::{AIProvider, CompletionPurpose, CompletionRequest, MessageRole};

use super::CallContext;

const MAX_TOKENS: u32 = 20;
const TEMPERATURE: f32 = 0.1;

/// Labels a user message with one of the closed intents.
pub struct IntentClassifier {
    ai_provider: Arc<dyn AIProvider>,
}

impl IntentClassifier {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    /// Classifies `message` given the turns that preceded it.
    pub async fn classify(&self, message: &str, context: &[Turn], call: &CallContext) -> Intent {
        let request = CompletionRequest::new(call.metadata(CompletionPurpose::ClassifyIntent))
            .with_system_prompt(system_prompt())
            .with_message(MessageRole::User, user_prompt(message, context))
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(TEMPERATURE);

        match self.ai_provider.complete(request).await {
            Ok(response) => {
                let intent = parse_intent_label(&response.content);
                tracing::debug!(
                    session_id = %call.session_id,
                    raw_label = %response.content.trim(),
                    intent = %intent,
                    "message classified"
                );
                intent
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %call.session_id,
                    trace_id = %call.trace_id,
                    error = %err,
                    "intent classification failed, defaulting to {}",
                    Intent::default()
                );
                Intent::default()
            }
        }
    }
}

fn system_prompt() -> String {
    let taxonomy = Intent::PRIORITY
        .iter()
        .map(|intent| format!("- {}: {}", intent.label(), intent.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "당신은 공간 대여 서비스의 의도 분류기입니다. 사용자의 현재 메시지를 아래 의도 중 하나로 분류하세요.\n\
         {}\n\n\
         이전 대화에서 공간 등록을 진행 중이고 현재 메시지가 그 질문에 대한 답이라면 ADD_SPACE로 분류하세요.\n\
         설명 없이 의도 이름 하나만 답하세요.",
        taxonomy
    )
}

fn user_prompt(message: &str, context: &[Turn]) -> String {
    if context.is_empty() {
        format!("현재 메시지: {}", message)
    } else {
        format!(
            "이전 대화:\n{}\n\n현재 메시지: {}",
            render_transcript(context),
            message
        )
    }
}
