//! Integration tests for conversations over the built-in support desk flow.
//!
//! These tests drive the orchestrator end to end:
//! 1. Menu navigation, back and restart
//! 2. Validation, capture and retry limits
//! 3. Debounce and per-user isolation
//! 4. Graph-level properties of the flow

use std::sync::Arc;

use proptest::prelude::*;
use tokio::sync::RwLock;

use chatflow::adapters::{EmbeddedFlowSource, InMemoryConversationStore, StoreSettings};
use chatflow::application::{EngineReplies, TurnOrchestrator, TurnOutcome, TurnResponse};
use chatflow::domain::conversation::{ContextValue, Direction};
use chatflow::domain::flow::{StepDefinition, StepRegistry};
use chatflow::domain::foundation::{StepId, Timestamp, UserId};
use chatflow::ports::{ConversationStore, FlowSource};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn step(id: &str) -> StepId {
    StepId::new(id).unwrap()
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

async fn support_desk() -> StepRegistry {
    EmbeddedFlowSource::support_desk()
        .load()
        .await
        .unwrap()
        .into_registry()
        .unwrap()
}

/// A conversation with a controllable clock.
struct Chat {
    orchestrator: TurnOrchestrator,
    store: Arc<InMemoryConversationStore>,
    clock: Timestamp,
}

impl Chat {
    fn new(registry: StepRegistry) -> Self {
        let store = Arc::new(InMemoryConversationStore::new(StoreSettings::new(
            registry.entry().clone(),
        )));
        let orchestrator =
            TurnOrchestrator::new(Arc::new(RwLock::new(registry)), store.clone());
        Self {
            orchestrator,
            store,
            clock: Timestamp::now(),
        }
    }

    async fn support_desk() -> Self {
        Self::new(support_desk().await)
    }

    /// Sends as `u1`, comfortably outside the debounce window.
    async fn send(&mut self, text: &str) -> TurnResponse {
        self.send_as("u1", text).await
    }

    async fn send_as(&mut self, user_id: &str, text: &str) -> TurnResponse {
        self.clock = self.clock.plus_millis(10_000);
        self.orchestrator
            .process_turn_at(&user(user_id), text, self.clock)
            .await
    }

    async fn send_immediately(&mut self, text: &str) -> TurnResponse {
        self.clock = self.clock.plus_millis(10);
        self.orchestrator
            .process_turn_at(&user("u1"), text, self.clock)
            .await
    }

    async fn history(&self) -> Vec<StepId> {
        self.store.snapshot(&user("u1")).await.unwrap().history
    }
}

fn replies() -> EngineReplies {
    EngineReplies::default()
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn greeting_shows_welcome_menu() {
    let mut chat = Chat::support_desk().await;

    let response = chat.send("hello").await;

    assert_eq!(response.step, step("welcome"));
    assert_eq!(response.outcome, TurnOutcome::MenuRepeated);
    assert_eq!(
        response.options,
        vec![
            "1. Technical support",
            "2. Billing and invoices",
            "3. Talk to a person",
        ]
    );
    assert!(response.text.starts_with("Hello! Welcome to the help desk."));
    assert!(!response.terminal);
}

#[tokio::test]
async fn menu_back_and_restart_round_trip() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;

    let menu = chat.send("1").await;
    assert_eq!(menu.step, step("support_menu"));
    assert_eq!(menu.outcome, TurnOutcome::Advanced);
    assert_eq!(menu.options.last().unwrap(), "#. Restart");
    assert_eq!(chat.history().await, vec![step("welcome")]);

    let back = chat.send("0").await;
    assert_eq!(back.step, step("welcome"));
    assert_eq!(back.outcome, TurnOutcome::WentBack);
    assert!(back.text.starts_with(&replies().back_banner));
    assert!(chat.history().await.is_empty());

    chat.send("1").await;
    let restarted = chat.send("#").await;
    assert_eq!(restarted.step, step("welcome"));
    assert_eq!(restarted.outcome, TurnOutcome::Restarted);
    assert!(restarted.text.starts_with(&replies().restart_banner));
    assert!(chat.history().await.is_empty());
}

#[tokio::test]
async fn options_match_by_key_and_label() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;
    chat.send("1").await;

    assert_eq!(chat.send("ACCOUNT").await.step, step("support_email"));
    chat.send("0").await;
    assert_eq!(chat.send("opening").await.step, step("support_hours"));
}

#[tokio::test]
async fn zero_at_the_entry_step_shows_the_menu() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;

    // Back is disabled at the welcome step and "0" is not an option number.
    let response = chat.send("0").await;

    assert_eq!(response.step, step("welcome"));
    assert_eq!(response.outcome, TurnOutcome::MenuRepeated);
    assert_eq!(response.options.len(), 3);
}

#[tokio::test]
async fn computed_transition_returns_to_previous_step() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;
    chat.send("1").await;
    assert_eq!(chat.send("3").await.step, step("support_hours"));

    let response = chat.send("ok").await;

    assert_eq!(response.step, step("support_menu"));
}

// =============================================================================
// Validation and capture
// =============================================================================

#[tokio::test]
async fn support_ticket_captures_problem_description() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;
    chat.send("1").await;
    chat.send("1").await;

    let short = chat.send("broken").await;
    assert_eq!(short.outcome, TurnOutcome::Retry);
    assert_eq!(short.step, step("support_describe"));
    assert!(short.text.starts_with("Please give us a little more detail"));

    let accepted = chat.send("My wifi keeps dropping every hour").await;
    assert_eq!(accepted.step, step("ticket_opened"));
    let data = accepted.data.unwrap();
    assert_eq!(
        data.get("problem"),
        Some(&ContextValue::Text("My wifi keeps dropping every hour".into()))
    );

    let done = chat.send("no").await;
    assert_eq!(done.step, step("goodbye"));
    assert!(done.terminal);
}

#[tokio::test]
async fn invoice_numbers_must_have_six_digits() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;
    chat.send("2").await;

    let rejected = chat.send("12ab").await;
    assert_eq!(rejected.outcome, TurnOutcome::Retry);
    assert!(rejected.text.starts_with("Invoice numbers have exactly 6 digits."));

    let accepted = chat.send("123456").await;
    assert_eq!(accepted.step, step("billing_done"));
    assert!(accepted.terminal);
    assert_eq!(
        accepted.data.unwrap().get("invoice"),
        Some(&ContextValue::Text("123456".into()))
    );
}

#[tokio::test]
async fn three_invalid_inputs_reset_the_session() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;
    chat.send("1").await;

    let first = chat.send("xyz").await;
    assert_eq!(first.outcome, TurnOutcome::Retry);
    assert!(first.text.starts_with(&replies().retry_generic));

    let second = chat.send("xyz").await;
    assert_eq!(second.outcome, TurnOutcome::Retry);
    assert!(second.text.starts_with(&replies().retry_numeric));

    let third = chat.send("xyz").await;
    assert_eq!(third.outcome, TurnOutcome::AttemptsExhausted);
    assert_eq!(third.step, step("welcome"));
    assert!(third.text.starts_with(&replies().attempts_exhausted));

    let snapshot = chat.store.snapshot(&user("u1")).await.unwrap();
    assert!(snapshot.history.is_empty());
    assert_eq!(snapshot.attempts, 0);
}

#[tokio::test]
async fn successful_move_clears_attempts() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;
    chat.send("1").await;
    chat.send("xyz").await;

    chat.send("2").await;

    let snapshot = chat.store.snapshot(&user("u1")).await.unwrap();
    assert_eq!(snapshot.current_step, step("support_email"));
    assert_eq!(snapshot.attempts, 0);
}

// =============================================================================
// Debounce, logging and isolation
// =============================================================================

#[tokio::test]
async fn rapid_second_message_is_debounced() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;

    let response = chat.send_immediately("1").await;

    assert_eq!(response.outcome, TurnOutcome::Debounced);
    assert_eq!(response.text, replies().debounce);
    assert_eq!(response.step, step("welcome"));

    let log = chat.store.message_log(&user("u1")).await.unwrap();
    let outgoing = log.iter().filter(|m| m.direction == Direction::Outgoing).count();
    assert_eq!(outgoing, 1);
}

#[tokio::test]
async fn message_log_records_both_directions() {
    let mut chat = Chat::support_desk().await;
    chat.send("hello").await;
    chat.send("1").await;

    let log = chat.store.message_log(&user("u1")).await.unwrap();

    let directions: Vec<Direction> = log.iter().map(|m| m.direction).collect();
    assert_eq!(
        directions,
        vec![
            Direction::Incoming,
            Direction::Outgoing,
            Direction::Incoming,
            Direction::Outgoing,
        ]
    );
    assert_eq!(log[0].text, "hello");
}

#[tokio::test]
async fn users_progress_independently() {
    let mut chat = Chat::support_desk().await;
    chat.send_as("alice", "hello").await;
    chat.send_as("bob", "hello").await;

    let alice = chat.send_as("alice", "1").await;
    let bob = chat.send_as("bob", "2").await;

    assert_eq!(alice.step, step("support_menu"));
    assert_eq!(bob.step, step("billing_invoice"));
}

#[tokio::test]
async fn concurrent_users_do_not_block_each_other() {
    let chat = Chat::support_desk().await;
    let orchestrator = Arc::new(chat.orchestrator);
    let now = Timestamp::now();

    let turns = (0..20).map(|i| {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            let id = user(&format!("user-{}", i));
            orchestrator.process_turn_at(&id, "1", now).await
        })
    });

    for turn in turns {
        let response = turn.await.unwrap();
        assert_eq!(response.step, step("support_menu"));
    }
    assert_eq!(chat.store.len().await, 20);
}

// =============================================================================
// Flow properties
// =============================================================================

#[tokio::test]
async fn every_support_desk_step_is_reachable() {
    let registry = support_desk().await;

    let reachable = registry.reachable_from_entry();

    assert_eq!(reachable.len(), registry.len());
    assert!(registry.check_wiring().is_ok());
}

/// welcome -> s1 -> s2 -> ... -> s8, each with a single option.
fn chain() -> StepRegistry {
    let mut registry = StepRegistry::new(
        StepDefinition::new(step("welcome"), "Start").with_option("go", "Go", step("s1")),
    )
    .unwrap();
    for i in 1..=8 {
        let next = if i == 8 { "welcome".to_string() } else { format!("s{}", i + 1) };
        registry
            .register(
                StepDefinition::new(step(&format!("s{}", i)), format!("Step {}", i))
                    .with_option("go", "Go", step(&next)),
            )
            .unwrap();
    }
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn backing_out_of_forward_moves_reaches_the_entry_step(forward in 1usize..=8) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let mut chat = Chat::new(chain());
            for _ in 0..forward {
                assert_eq!(chat.send("1").await.outcome, TurnOutcome::Advanced);
            }
            assert_eq!(chat.history().await.len(), forward);

            for _ in 0..forward {
                assert_eq!(chat.send("0").await.outcome, TurnOutcome::WentBack);
            }
            let last = chat.send("0").await;
            assert_eq!(last.outcome, TurnOutcome::BackUnavailable);
            assert_eq!(last.step, step("welcome"));
        });
    }
}
