//! End-to-end conversation scenarios against the message orchestrator.
//!
//! Each test wires the real handlers over an in-memory key-value store and
//! a scripted gateway, then drives whole conversations through them.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use space_concierge::adapters::ai::{MockAIProvider, MockError};
use space_concierge::adapters::kv::{KvConversationStore, KvRegistrationStore, KvSpaceRepository};
use space_concierge::adapters::storage::InMemoryKeyValueStore;
use space_concierge::application::handlers::{
    AdvanceRegistrationHandler, HandleMessageCommand, HandleMessageHandler, ReplyPayload,
    SearchSpacesHandler,
};
use space_concierge::application::services::{FieldExtractor, IntentClassifier, ResponseSynthesizer};
use space_concierge::domain::conversation::MAX_STORED_TURNS;
use space_concierge::domain::foundation::SessionId;
use space_concierge::domain::intent::Intent;
use space_concierge::domain::registration::{FieldName, FieldValue, RegistrationOutcome};
use space_concierge::domain::space::SearchMode;
use space_concierge::ports::{
    AIProvider, CompletionPurpose, ConversationStore, KeyValueStore, RegistrationStore,
    SpaceRepository,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Engine {
    handler: HandleMessageHandler,
    conversations: Arc<KvConversationStore>,
    registrations: Arc<KvRegistrationStore>,
    spaces: Arc<KvSpaceRepository>,
}

impl Engine {
    fn new(kv: Arc<InMemoryKeyValueStore>, ai: MockAIProvider) -> Self {
        let ai: Arc<dyn AIProvider> = Arc::new(ai);
        let conversations = Arc::new(KvConversationStore::new(kv.clone()));
        let registrations = Arc::new(KvRegistrationStore::new(kv.clone()));
        let spaces = Arc::new(KvSpaceRepository::new(kv));
        let synthesizer = Arc::new(ResponseSynthesizer::new(ai.clone()));

        let handler = HandleMessageHandler::new(
            conversations.clone(),
            IntentClassifier::new(ai.clone()),
            SearchSpacesHandler::new(spaces.clone(), synthesizer.clone()),
            AdvanceRegistrationHandler::new(
                registrations.clone(),
                spaces.clone(),
                FieldExtractor::new(ai),
                synthesizer.clone(),
            ),
            synthesizer,
        );

        Self {
            handler,
            conversations,
            registrations,
            spaces,
        }
    }

    async fn send(&self, session: &str, message: &str) -> space_concierge::application::HandleMessageResult {
        self.handler
            .handle(HandleMessageCommand {
                session_id: SessionId::new(session).unwrap(),
                message: message.to_string(),
            })
            .await
    }
}

fn extracted(value: serde_json::Value) -> String {
    json!({ "extractedValue": value, "isValid": true }).to_string()
}

fn registration(payload: &ReplyPayload) -> &space_concierge::application::AdvanceRegistrationResult {
    match payload {
        ReplyPayload::Registration(result) => result,
        other => panic!("expected registration payload, got {:?}", other),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn scenario_a_fresh_session_is_asked_for_space_name() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let engine = Engine::new(
        kv,
        MockAIProvider::new().with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE"),
    );

    let result = engine.send("scenario-a", "우리 카페 등록하고 싶어").await;

    assert_eq!(result.intent, Intent::AddSpace);
    assert!(result.reply.contains("공간의 이름"));
    let state = engine
        .registrations
        .load(&SessionId::new("scenario-a").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.step, 1);
    assert!(state.collected.collected_fields().is_empty());
}

#[tokio::test]
async fn scenario_b_space_name_advances_to_address() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let engine = Engine::new(
        kv,
        MockAIProvider::new()
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ExtractField, extracted(json!("스튜디오 A"))),
    );

    engine.send("scenario-b", "공간 등록하고 싶어요").await;
    let result = engine.send("scenario-b", "스튜디오 A").await;

    let reg = registration(&result.payload);
    assert_eq!(reg.outcome, RegistrationOutcome::Advanced);
    assert_eq!(reg.step, Some(2));
    assert!(result.reply.contains("주소"));

    let state = engine
        .registrations
        .load(&SessionId::new("scenario-b").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.step, 2);
    assert_eq!(
        state.collected.get(FieldName::SpaceName),
        Some(FieldValue::SpaceName("스튜디오 A".to_string()))
    );
}

#[tokio::test]
async fn scenario_c_keyword_search_finds_matching_space() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    kv.put(
        "space_1",
        json!({
            "id": "space_1",
            "name": "송도 스튜디오",
            "address": "인천 연수구 송도동 24",
            "amenities": ["오디오"]
        }),
    )
    .await
    .unwrap();
    kv.put(
        "space_2",
        json!({ "id": "space_2", "name": "해운대 라운지", "address": "부산 해운대구", "amenities": ["프로젝터"] }),
    )
    .await
    .unwrap();
    let engine = Engine::new(
        kv,
        MockAIProvider::new().with_purpose_response(CompletionPurpose::ClassifyIntent, "SEARCH_SPACE"),
    );

    let result = engine.send("scenario-c", "인천 오디오 있는 공간").await;

    match &result.payload {
        ReplyPayload::Search(search) => {
            assert_eq!(search.total_count(), 1);
            assert_eq!(search.listings[0].name, "송도 스튜디오");
            assert_eq!(search.listings[0].capacity, 0);
        }
        other => panic!("expected search payload, got {:?}", other),
    }
    assert!(!result.reply.is_empty());
}

#[tokio::test]
async fn scenario_d_unmatched_search_apologizes() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let engine = Engine::new(
        kv,
        MockAIProvider::new()
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "SEARCH_SPACE")
            .with_purpose_error(
                CompletionPurpose::SynthesizeReply,
                MockError::Unavailable { message: "down".to_string() },
            ),
    );

    let result = engine.send("scenario-d", "좋은 데 있어요?").await;

    match &result.payload {
        ReplyPayload::Search(search) => {
            assert_eq!(search.total_count(), 0);
            assert_eq!(search.search_mode, SearchMode::Keyword);
        }
        other => panic!("expected search payload, got {:?}", other),
    }
    assert!(!result.reply.is_empty());
}

// =============================================================================
// Registration flow
// =============================================================================

#[tokio::test]
async fn full_registration_produces_one_record() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let answers = [
        ("스튜디오 A", json!("스튜디오 A")),
        ("인천 연수구 송도동 24", json!("인천 연수구 송도동 24")),
        ("녹음 스튜디오예요", json!("녹음 스튜디오")),
        ("20명까지 가능해요", json!(20)),
        ("오디오랑 마이크 있어요", json!(["오디오", "마이크"])),
        ("운영 시간은 없어요", serde_json::Value::Null),
        ("010-1234-5678", json!("010-1234-5678")),
    ];

    let mut ai = MockAIProvider::new();
    for _ in 0..=answers.len() {
        ai = ai.with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE");
    }
    for (_, value) in &answers {
        ai = ai.with_purpose_response(CompletionPurpose::ExtractField, extracted(value.clone()));
    }
    let engine = Engine::new(kv, ai);

    engine.send("full-run", "공간 등록하고 싶어요").await;
    let mut last = None;
    for (message, _) in &answers {
        last = Some(engine.send("full-run", message).await);
    }

    let result = last.unwrap();
    let reg = registration(&result.payload);
    assert_eq!(reg.outcome, RegistrationOutcome::Completed);
    let space = reg.space.clone().unwrap();
    assert_eq!(space.id.as_str(), "space_1");
    assert_eq!(space.name, "스튜디오 A");
    assert_eq!(space.capacity, 20);
    assert_eq!(space.amenities, vec!["오디오", "마이크"]);
    assert_eq!(space.contact, "010-1234-5678");
    assert!(!space.booking_policy.deposit_required);
    assert!(!space.sensors.occupancy);

    let session = SessionId::new("full-run").unwrap();
    assert!(engine.registrations.load(&session).await.unwrap().is_none());
    assert_eq!(engine.spaces.list_all().await.unwrap().len(), 1);

    let conversation = engine.conversations.load(&session).await.unwrap().unwrap();
    assert_eq!(conversation.len(), 16);
}

#[tokio::test]
async fn invalid_answer_keeps_step_and_collected_fields() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let engine = Engine::new(
        kv,
        MockAIProvider::new()
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ExtractField, extracted(json!("스튜디오 A")))
            .with_purpose_response(
                CompletionPurpose::ExtractField,
                json!({ "extractedValue": null, "isValid": false, "errorMessage": "주소가 필요해요" })
                    .to_string(),
            ),
    );

    engine.send("retry", "등록할래요").await;
    engine.send("retry", "스튜디오 A").await;
    let result = engine.send("retry", "몰라요").await;

    let reg = registration(&result.payload);
    assert_eq!(reg.outcome, RegistrationOutcome::Retry);
    assert_eq!(reg.step, Some(2));
    assert!(result.reply.contains("주소가 필요해요"));

    let state = engine
        .registrations
        .load(&SessionId::new("retry").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.step, 2);
    assert_eq!(state.collected.collected_fields(), vec![FieldName::SpaceName]);
}

#[tokio::test]
async fn switching_intent_leaves_registration_in_place() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let engine = Engine::new(
        kv,
        MockAIProvider::new()
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "SEARCH_SPACE")
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ExtractField, extracted(json!("스튜디오 A"))),
    );

    engine.send("switch", "등록할래요").await;
    engine.send("switch", "서울에 있는 공간 보여줘").await;
    let result = engine.send("switch", "스튜디오 A").await;

    let reg = registration(&result.payload);
    assert_eq!(reg.outcome, RegistrationOutcome::Advanced);
    assert_eq!(reg.step, Some(2));
}

#[tokio::test]
async fn history_stays_bounded_over_long_conversation() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let engine = Engine::new(kv, MockAIProvider::new());

    for i in 0..15 {
        engine.send("long", &format!("메시지 {}", i)).await;
    }

    let conversation = engine
        .conversations
        .load(&SessionId::new("long").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.len(), MAX_STORED_TURNS);
    assert_eq!(conversation.turns()[0].content, "메시지 5");
}

// Two identical answers racing on one session both read the same state and
// both write the same advance. Last writer wins; nothing else is corrupted.
#[tokio::test]
async fn concurrent_duplicate_answers_advance_once() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let address = extracted(json!("인천 연수구 송도동 24"));
    let engine = Engine::new(
        kv,
        MockAIProvider::new()
            .with_delay(Duration::from_millis(20))
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ClassifyIntent, "ADD_SPACE")
            .with_purpose_response(CompletionPurpose::ExtractField, address.clone())
            .with_purpose_response(CompletionPurpose::ExtractField, address),
    );

    let session = SessionId::new("race").unwrap();
    let mut state = space_concierge::domain::registration::RegistrationState::new(session.clone());
    state.collected.apply(FieldValue::SpaceName("스튜디오 A".to_string()));
    state.step = 2;
    engine.registrations.save(&state).await.unwrap();

    let (first, second) = futures::join!(
        engine.send("race", "인천 연수구 송도동 24"),
        engine.send("race", "인천 연수구 송도동 24"),
    );

    assert_eq!(registration(&first.payload).outcome, RegistrationOutcome::Advanced);
    assert_eq!(registration(&second.payload).outcome, RegistrationOutcome::Advanced);

    let state = engine.registrations.load(&session).await.unwrap().unwrap();
    assert_eq!(state.step, 3);
    assert_eq!(
        state.collected.collected_fields(),
        vec![FieldName::SpaceName, FieldName::Address]
    );

    let turns = engine.conversations.load(&session).await.unwrap().unwrap().len();
    assert!((2..=4).contains(&turns));
}
