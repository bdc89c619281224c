//! Integration tests for the journey orchestration flow.
//!
//! These tests verify the end-to-end path:
//! 1. A turn arrives for a (customer, intent) pair
//! 2. The session store resolves or creates the session
//! 3. The extractor turns the utterance into fields
//! 4. The stage machine merges, advances, and picks the reply
//! 5. The updated session is committed in one put
//!
//! Uses the in-memory store and the mock extractor, so the suite runs
//! without external services.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use waypoint::adapters::{InMemorySessionStore, MockError, MockExtractor};
use waypoint::application::handlers::admin::{
    ClearSessionCommand, ClearSessionHandler, GetSessionError, GetSessionHandler, GetSessionQuery,
};
use waypoint::application::handlers::turn::{ProcessTurnCommand, ProcessTurnHandler};
use waypoint::domain::foundation::{CustomerId, Intent, SessionStatus};
use waypoint::domain::journey::{parse_journey_yaml, JourneyRegistry, StageId};
use waypoint::domain::orchestration::CLARIFICATION_REPLY;
use waypoint::domain::session::TurnRole;
use waypoint::ports::{Extraction, SessionStore};

const HOSPITAL_YAML: &str = r#"
intent: find_hospital
entry_stage_id: ask_admission
final_message: "Thanks, we have everything we need to find your hospital."
stages:
  - id: ask_admission
    required_fields: [needsAdmission]
    prompt: "Do you need hospital admission?"
    transitions:
      - target: ask_self_or_other
  - id: ask_self_or_other
    required_fields: [patientRelation]
    prompt: "Is this for yourself or someone else?"
    transitions:
      - target: ask_symptom
  - id: ask_symptom
    required_fields: [symptom]
    prompt: "What symptoms are you experiencing?"
    transitions:
      - target: ask_location
  - id: ask_location
    required_fields: [location]
    prompt: "Which area should we search near?"
    transitions:
      - target: "$end"
"#;

fn registry() -> Arc<JourneyRegistry> {
    let journey = parse_journey_yaml(HOSPITAL_YAML).unwrap();
    Arc::new(JourneyRegistry::new(vec![journey]).unwrap())
}

fn command(customer: &str, utterance: &str) -> ProcessTurnCommand {
    ProcessTurnCommand {
        customer_id: CustomerId::new(customer).unwrap(),
        intent: Intent::new("find_hospital").unwrap(),
        utterance: utterance.to_string(),
        channel: None,
    }
}

// =============================================================================
// Scenario A: full hospital journey through terminal
// =============================================================================

#[tokio::test]
async fn scenario_a_full_journey_to_completion() {
    let store = Arc::new(InMemorySessionStore::new());
    let extractor = MockExtractor::new()
        .with_extraction(Extraction::empty())
        .with_extraction(Extraction::empty().with_field("needsAdmission", json!(true)))
        .with_extraction(Extraction::empty().with_field("patientRelation", json!("self")))
        .with_extraction(Extraction::empty().with_field("symptom", json!("chest pain")))
        .with_extraction(Extraction::empty().with_field("location", json!("Andheri")));
    let handler = ProcessTurnHandler::new(store.clone(), Arc::new(extractor), registry());

    // "I need to find a hospital near me" -> no fields, stays put.
    let r1 = handler
        .handle(command("cust-1", "I need to find a hospital near me"))
        .await
        .unwrap();
    assert_eq!(r1.session.current_stage_id, StageId::new("ask_admission"));
    assert_eq!(r1.reply, "Do you need hospital admission?");

    // "Yes, I need admission" -> advances to ask_self_or_other.
    let r2 = handler
        .handle(command("cust-1", "Yes, I need admission"))
        .await
        .unwrap();
    assert_eq!(r2.session.current_stage_id, StageId::new("ask_self_or_other"));

    // "I'm looking for myself" -> advances to ask_symptom.
    let r3 = handler
        .handle(command("cust-1", "I'm looking for myself"))
        .await
        .unwrap();
    assert_eq!(r3.session.current_stage_id, StageId::new("ask_symptom"));

    // "I have chest pain" -> advances to ask_location.
    let r4 = handler
        .handle(command("cust-1", "I have chest pain"))
        .await
        .unwrap();
    assert_eq!(r4.session.current_stage_id, StageId::new("ask_location"));

    // "Andheri" -> terminal, completed.
    let r5 = handler.handle(command("cust-1", "Andheri")).await.unwrap();
    assert_eq!(r5.session.status, SessionStatus::Completed);
    assert_eq!(
        r5.reply,
        "Thanks, we have everything we need to find your hospital."
    );

    // One session carried the whole journey, every turn committed.
    let ids = [&r1, &r2, &r3, &r4, &r5]
        .iter()
        .map(|r| r.session_id)
        .collect::<Vec<_>>();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));

    let stored = store.get(r5.session_id).await.unwrap();
    assert_eq!(stored.collected_data["needsAdmission"], json!(true));
    assert_eq!(stored.collected_data["patientRelation"], json!("self"));
    assert_eq!(stored.collected_data["symptom"], json!("chest pain"));
    assert_eq!(stored.collected_data["location"], json!("Andheri"));
    // 5 turns, two history entries each.
    assert_eq!(stored.history.len(), 10);
}

// =============================================================================
// Scenario B: extractor failure mid-journey
// =============================================================================

#[tokio::test]
async fn scenario_b_extractor_failure_holds_state() {
    let store = Arc::new(InMemorySessionStore::new());
    let extractor = MockExtractor::new()
        .with_extraction(Extraction::empty().with_field("needsAdmission", json!(true)))
        .with_error(MockError::Timeout { timeout_secs: 15 });
    let handler = ProcessTurnHandler::new(store.clone(), Arc::new(extractor), registry());

    let before = handler
        .handle(command("cust-1", "Yes, I need admission"))
        .await
        .unwrap();

    let after = handler
        .handle(command("cust-1", "for myself"))
        .await
        .unwrap();

    assert_eq!(
        after.session.current_stage_id,
        before.session.current_stage_id
    );
    assert_eq!(after.session.collected_data, before.session.collected_data);
    assert_eq!(after.reply, CLARIFICATION_REPLY);
    assert_eq!(after.session.status, SessionStatus::Active);
}

#[tokio::test]
async fn scenario_b_hard_timeout_holds_state() {
    let store = Arc::new(InMemorySessionStore::new());
    let extractor = MockExtractor::new()
        .with_delay(Duration::from_millis(200))
        .with_extraction(Extraction::empty().with_field("needsAdmission", json!(true)));
    let handler = ProcessTurnHandler::new(store.clone(), Arc::new(extractor), registry())
        .with_extraction_timeout(Duration::from_millis(20));

    let result = handler
        .handle(command("cust-1", "Yes, I need admission"))
        .await
        .unwrap();

    assert_eq!(result.session.current_stage_id, StageId::new("ask_admission"));
    assert!(result.session.collected_data.is_empty());
    assert_eq!(result.reply, CLARIFICATION_REPLY);
}

// =============================================================================
// Scenario C: concurrent turns on one conversation serialize
// =============================================================================

#[tokio::test]
async fn scenario_c_concurrent_turns_do_not_lose_updates() {
    let store = Arc::new(InMemorySessionStore::new());
    let extractor = MockExtractor::new()
        .with_delay(Duration::from_millis(25))
        .with_extraction(Extraction::empty().with_field("needsAdmission", json!(true)))
        .with_extraction(Extraction::empty().with_field("patientRelation", json!("self")));
    let handler = Arc::new(ProcessTurnHandler::new(
        store.clone(),
        Arc::new(extractor),
        registry(),
    ));

    let first = {
        let handler = handler.clone();
        tokio::spawn(async move {
            handler
                .handle(command("cust-1", "Yes, I need admission"))
                .await
                .unwrap()
        })
    };
    let second = {
        let handler = handler.clone();
        tokio::spawn(async move {
            handler
                .handle(command("cust-1", "It's for me"))
                .await
                .unwrap()
        })
    };
    let (a, b) = (first.await.unwrap(), second.await.unwrap());
    assert_eq!(a.session_id, b.session_id);

    // Both merges survived in some serial order: no lost update.
    let stored = store.get(a.session_id).await.unwrap();
    assert_eq!(stored.collected_data["needsAdmission"], json!(true));
    assert_eq!(stored.collected_data["patientRelation"], json!("self"));
    // Two full turns were recorded.
    assert_eq!(stored.history.len(), 4);
    assert_eq!(stored.current_stage_id, StageId::new("ask_symptom"));
}

// =============================================================================
// Session identity and history properties
// =============================================================================

#[tokio::test]
async fn idempotent_creation_returns_same_session() {
    let store = InMemorySessionStore::new();
    let customer = CustomerId::new("cust-1").unwrap();
    let intent = Intent::new("find_hospital").unwrap();
    let entry = StageId::new("ask_admission");

    let (first, _) = store.get_or_create(&customer, &intent, &entry).await.unwrap();
    let (second, _) = store.get_or_create(&customer, &intent, &entry).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn history_grows_by_two_per_turn_and_alternates() {
    let handler = ProcessTurnHandler::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(MockExtractor::new()),
        registry(),
    );

    let mut expected = 0;
    for utterance in ["one", "two", "three"] {
        let result = handler.handle(command("cust-1", utterance)).await.unwrap();
        expected += 2;
        assert_eq!(result.session.history.len(), expected);
    }

    let result = handler.handle(command("cust-1", "four")).await.unwrap();
    for pair in result.session.history.chunks(2) {
        assert_eq!(pair[0].role, TurnRole::Customer);
        assert_eq!(pair[1].role, TurnRole::Agent);
    }
}

#[tokio::test]
async fn no_stage_advance_without_complete_fields() {
    let handler = ProcessTurnHandler::new(
        Arc::new(InMemorySessionStore::new()),
        // Extractor keeps returning nothing useful.
        Arc::new(MockExtractor::new()),
        registry(),
    );

    for _ in 0..3 {
        let result = handler.handle(command("cust-1", "um, hello?")).await.unwrap();
        assert_eq!(result.session.current_stage_id, StageId::new("ask_admission"));
    }
}

#[tokio::test]
async fn field_overwrite_preserves_unrelated_fields() {
    let store = Arc::new(InMemorySessionStore::new());
    let extractor = MockExtractor::new()
        .with_extraction(Extraction::empty().with_field("needsAdmission", json!(true)))
        .with_extraction(
            Extraction::empty()
                .with_field("patientRelation", json!("self"))
                .with_field("symptom", json!("chest pain")),
        )
        // Re-extraction of location must not erase symptom.
        .with_extraction(Extraction::empty().with_field("location", json!("Andheri")));
    let handler = ProcessTurnHandler::new(store.clone(), Arc::new(extractor), registry());

    handler.handle(command("cust-1", "yes")).await.unwrap();
    handler.handle(command("cust-1", "me, chest pain")).await.unwrap();
    let result = handler.handle(command("cust-1", "Andheri")).await.unwrap();

    assert_eq!(result.session.collected_data["symptom"], json!("chest pain"));
    assert_eq!(result.session.collected_data["location"], json!("Andheri"));
}

// =============================================================================
// Administrative surface
// =============================================================================

#[tokio::test]
async fn admin_can_inspect_and_clear_sessions() {
    let store = Arc::new(InMemorySessionStore::new());
    let turn_handler = ProcessTurnHandler::new(
        store.clone(),
        Arc::new(MockExtractor::new()),
        registry(),
    );

    let result = turn_handler.handle(command("cust-1", "hello")).await.unwrap();

    let get_handler = GetSessionHandler::new(store.clone());
    let session = get_handler
        .handle(GetSessionQuery {
            session_id: result.session_id,
        })
        .await
        .unwrap();
    assert_eq!(session.history.len(), 2);

    let clear_handler = ClearSessionHandler::new(store.clone());
    clear_handler
        .handle(ClearSessionCommand {
            session_id: result.session_id,
        })
        .await
        .unwrap();

    let lookup = get_handler
        .handle(GetSessionQuery {
            session_id: result.session_id,
        })
        .await;
    assert!(matches!(lookup, Err(GetSessionError::NotFound(_))));
}

#[tokio::test]
async fn intent_change_orphans_and_abandons_prior_session() {
    let store = Arc::new(InMemorySessionStore::new());
    let hospital = parse_journey_yaml(HOSPITAL_YAML).unwrap();
    let checkup = parse_journey_yaml(
        r#"
intent: book_checkup
entry_stage_id: ask_date
stages:
  - id: ask_date
    required_fields: [date]
    prompt: "When would you like to come in?"
    transitions:
      - target: "$end"
"#,
    )
    .unwrap();
    let registry = Arc::new(JourneyRegistry::new(vec![hospital, checkup]).unwrap());
    let handler = ProcessTurnHandler::new(store.clone(), Arc::new(MockExtractor::new()), registry);

    let first = handler.handle(command("cust-1", "hello")).await.unwrap();

    let mut switch = command("cust-1", "actually, book me a checkup");
    switch.intent = Intent::new("book_checkup").unwrap();
    let second = handler.handle(switch).await.unwrap();

    assert_ne!(first.session_id, second.session_id);
    let orphan = store.get(first.session_id).await.unwrap();
    assert_eq!(orphan.status, SessionStatus::Abandoned);
}
