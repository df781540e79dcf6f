//! Per-step field extraction through the text-completion gateway.

use std::sync::Arc;

use crate::domain::conversation::{render_transcript, Turn};
use crate::domain::registration::{parse_extraction_response, FieldExtraction, RegistrationStep};
use crate::ports::{AIError, AIProvider, CompletionPurpose, CompletionRequest, MessageRole};

use super::CallContext;

const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.1;

/// Asks the gateway to pull one step's value out of a user message.
pub struct FieldExtractor {
    ai_provider: Arc<dyn AIProvider>,
}

impl FieldExtractor {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    /// Extracts `step`'s value from `message`.
    ///
    /// Gateway failures are returned as errors. A reply that cannot be
    /// parsed is not an error; it comes back as an invalid extraction.
    pub async fn extract(
        &self,
        message: &str,
        step: &RegistrationStep,
        context: &[Turn],
        call: &CallContext,
    ) -> Result<FieldExtraction, AIError> {
        let request = CompletionRequest::new(call.metadata(CompletionPurpose::ExtractField))
            .with_system_prompt(system_prompt(step))
            .with_message(MessageRole::User, user_prompt(message, context))
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(TEMPERATURE);

        let response = self.ai_provider.complete(request).await?;
        let extraction = parse_extraction_response(step.field, &response.content);

        tracing::debug!(
            session_id = %call.session_id,
            field = %step.field,
            is_valid = extraction.is_valid,
            has_value = extraction.value.is_some(),
            "field extracted"
        );

        Ok(extraction)
    }
}

fn system_prompt(step: &RegistrationStep) -> String {
    let optional = if step.required {
        "필수 항목입니다. 값을 찾을 수 없으면 isValid를 false로 하세요."
    } else {
        "선택 항목입니다. 사용자가 없다고 답하면 extractedValue를 null, isValid를 true로 하세요."
    };

    format!(
        "당신은 공간 등록 정보를 추출하는 도우미입니다.\n\
         사용자의 메시지에서 '{label}' 값만 추출하세요. 설명: {description}. 예시: {example}.\n\
         값 형식: {format}.\n\
         {optional}\n\
         다른 항목에 해당하는 정보는 무시하세요.\n\
         반드시 다음 JSON 객체 하나로만 답하세요:\n\
         {{\"extractedValue\": <값 또는 null>, \"isValid\": true 또는 false, \"errorMessage\": <사용자에게 보여줄 이유 또는 null>}}",
        label = step.field.label(),
        description = step.description,
        example = step.example,
        format = step.field.value_format(),
        optional = optional,
    )
}

fn user_prompt(message: &str, context: &[Turn]) -> String {
    if context.is_empty() {
        format!("사용자 메시지: {}", message)
    } else {
        format!(
            "이전 대화:\n{}\n\n사용자 메시지: {}",
            render_transcript(context),
            message
        )
    }
}
