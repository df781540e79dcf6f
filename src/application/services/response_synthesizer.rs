//! Natural-language replies through the text-completion gateway.
//!
//! Every reply kind has a fixed fallback from `domain::replies`, used when
//! the gateway fails or answers with blank text. The result is never empty.

use std::sync::Arc;

use crate::domain::conversation::{render_transcript, Turn};
use crate::domain::registration::RegistrationStep;
use crate::domain::replies;
use crate::domain::space::SpaceListing;
use crate::ports::{AIProvider, CompletionPurpose, CompletionRequest, MessageRole};

use super::CallContext;

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "당신은 공간 대여 플랫폼의 친절한 한국어 상담원입니다. \
     주어진 정보만 사용해 짧고 자연스럽게 답하세요. 정보를 지어내지 마세요.";

/// What a reply is about.
#[derive(Debug, Clone, Copy)]
pub enum ReplyKind<'a> {
    /// Results of a keyword search (possibly empty).
    SearchResults {
        message: &'a str,
        listings: &'a [SpaceListing],
    },
    /// Opening of a new registration; the first step prompt is always appended.
    RegistrationGreeting {
        message: &'a str,
        first_step: &'a RegistrationStep,
    },
    /// A request to create a user profile.
    ProfileCreation { message: &'a str },
}

/// Turns structured results into conversational replies.
pub struct ResponseSynthesizer {
    ai_provider: Arc<dyn AIProvider>,
}

impl ResponseSynthesizer {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    /// Produces the reply for `kind`, falling back to a fixed text on failure.
    pub async fn synthesize(&self, kind: ReplyKind<'_>, context: &[Turn], call: &CallContext) -> String {
        let request = CompletionRequest::new(call.metadata(CompletionPurpose::SynthesizeReply))
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt_for(kind, context))
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(TEMPERATURE);

        let generated = match self.ai_provider.complete(request).await {
            Ok(response) if !response.content.trim().is_empty() => Some(response.content.trim().to_string()),
            Ok(_) => {
                tracing::warn!(session_id = %call.session_id, "gateway returned an empty reply, using fallback");
                None
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %call.session_id,
                    trace_id = %call.trace_id,
                    error = %err,
                    "reply synthesis failed, using fallback"
                );
                None
            }
        };

        match (kind, generated) {
            (ReplyKind::RegistrationGreeting { first_step, .. }, Some(intro)) => {
                format!("{}\n{}", intro, replies::step_prompt(first_step))
            }
            (_, Some(text)) => text,
            (kind, None) => fallback_for(kind),
        }
    }
}

fn fallback_for(kind: ReplyKind<'_>) -> String {
    match kind {
        ReplyKind::SearchResults { listings, .. } => replies::search_results(listings),
        ReplyKind::RegistrationGreeting { first_step, .. } => replies::registration_greeting(first_step),
        ReplyKind::ProfileCreation { .. } => replies::profile_intro(),
    }
}

fn prompt_for(kind: ReplyKind<'_>, context: &[Turn]) -> String {
    let task = match kind {
        ReplyKind::SearchResults { message, listings } if listings.is_empty() => format!(
            "사용자가 \"{}\"(으)로 공간을 검색했지만 조건에 맞는 공간이 없습니다. \
             찾지 못했다고 사과하고 지역이나 장비(오디오, 마이크, 프로젝터 등)를 넣어 다시 검색해 보라고 안내하세요.",
            message
        ),
        ReplyKind::SearchResults { message, listings } => {
            let lines = listings
                .iter()
                .map(|l| {
                    let amenities = if l.amenities.is_empty() {
                        "없음".to_string()
                    } else {
                        l.amenities.join(", ")
                    };
                    format!("- {} / 주소: {} / 편의시설: {}", l.name, l.address, amenities)
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "사용자가 \"{}\"(으)로 공간을 검색했고 {}개의 공간을 찾았습니다:\n{}\n\
                 검색 결과를 간단히 소개하세요.",
                message,
                listings.len(),
                lines
            )
        }
        ReplyKind::RegistrationGreeting { message, .. } => format!(
            "사용자가 \"{}\"라고 말하며 공간 등록을 시작하려 합니다. \
             등록을 도와주겠다는 한두 문장의 인사만 하세요. 질문은 하지 마세요.",
            message
        ),
        ReplyKind::ProfileCreation { message } => format!(
            "사용자가 \"{}\"라고 말하며 프로필을 만들고 싶어 합니다. \
             이름과 관심 있는 공간 유형을 알려달라고 안내하세요.",
            message
        ),
    };

    if context.is_empty() {
        task
    } else {
        format!("이전 대화:\n{}\n\n{}", render_transcript(context), task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::SessionId;
    use crate::domain::registration::step_for;
    use crate::domain::space::search_records;
    use serde_json::json;

    fn call() -> CallContext {
        CallContext::new(SessionId::new("sess-1").unwrap(), "trace-1")
    }

    fn listings() -> Vec<SpaceListing> {
        let record: crate::domain::space::SpaceRecord = serde_json::from_value(json!({
            "id": "space_1",
            "name": "스튜디오 A",
            "address": "인천 연수구",
            "amenities": ["오디오"]
        }))
        .unwrap();
        search_records(&[record], "인천 오디오")
    }

    fn unavailable() -> MockError {
        MockError::Unavailable {
            message: "down".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_generated_text() {
        let provider = Arc::new(MockAIProvider::new().with_response("  스튜디오 A를 추천드려요!  "));
        let synthesizer = ResponseSynthesizer::new(provider);
        let listings = listings();

        let reply = synthesizer
            .synthesize(
                ReplyKind::SearchResults { message: "인천 오디오", listings: &listings },
                &[],
                &call(),
            )
            .await;

        assert_eq!(reply, "스튜디오 A를 추천드려요!");
    }

    #[tokio::test]
    async fn search_prompt_lists_each_hit() {
        let provider = Arc::new(MockAIProvider::new());
        let synthesizer = ResponseSynthesizer::new(provider.clone());
        let listings = listings();

        synthesizer
            .synthesize(
                ReplyKind::SearchResults { message: "인천 오디오", listings: &listings },
                &[],
                &call(),
            )
            .await;

        let prompt = provider.get_calls()[0].last_user_message().unwrap().to_string();
        assert!(prompt.contains("- 스튜디오 A / 주소: 인천 연수구 / 편의시설: 오디오"));
    }

    #[tokio::test]
    async fn fallback_names_first_hit_on_failure() {
        let provider = Arc::new(MockAIProvider::new().with_error(unavailable()));
        let synthesizer = ResponseSynthesizer::new(provider);
        let listings = listings();

        let reply = synthesizer
            .synthesize(
                ReplyKind::SearchResults { message: "인천 오디오", listings: &listings },
                &[],
                &call(),
            )
            .await;

        assert!(reply.contains("스튜디오 A"));
    }

    #[tokio::test]
    async fn blank_generation_uses_fallback() {
        let provider = Arc::new(MockAIProvider::new().with_response("   "));
        let synthesizer = ResponseSynthesizer::new(provider);

        let reply = synthesizer
            .synthesize(ReplyKind::SearchResults { message: "아무거나", listings: &[] }, &[], &call())
            .await;

        assert_eq!(reply, replies::search_no_results());
    }

    #[tokio::test]
    async fn greeting_always_ends_with_first_step_prompt() {
        let first = step_for(1).unwrap();

        let provider = Arc::new(MockAIProvider::new().with_response("반가워요! 등록을 도와드릴게요."));
        let reply = ResponseSynthesizer::new(provider)
            .synthesize(
                ReplyKind::RegistrationGreeting { message: "카페 등록", first_step: first },
                &[],
                &call(),
            )
            .await;
        assert!(reply.ends_with(&replies::step_prompt(first)));

        let failing = Arc::new(MockAIProvider::new().with_error(unavailable()));
        let reply = ResponseSynthesizer::new(failing)
            .synthesize(
                ReplyKind::RegistrationGreeting { message: "카페 등록", first_step: first },
                &[],
                &call(),
            )
            .await;
        assert_eq!(reply, replies::registration_greeting(first));
    }

    #[tokio::test]
    async fn profile_fallback_is_not_empty() {
        let provider = Arc::new(MockAIProvider::new().with_error(unavailable()));
        let reply = ResponseSynthesizer::new(provider)
            .synthesize(ReplyKind::ProfileCreation { message: "프로필" }, &[], &call())
            .await;

        assert_eq!(reply, replies::profile_intro());
    }
}
