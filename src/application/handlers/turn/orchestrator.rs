//! Turn orchestration - one inbound message in, one reply out.
//!
//! A turn holds the user's conversation lease from the first log write to
//! the last, so the whole turn is atomic for that user. Every input ends in
//! a rendered reply; broken flows and failing actions reset the session
//! instead of surfacing errors.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info_span, warn, Instrument};

use crate::domain::conversation::{
    parse_positive_integer, Conversation, ControlCommand, InputSanitizer,
};
use crate::domain::flow::{
    validate, ActionInput, Resolution, StepDefinition, StepRegistry, StepRenderer,
    ValidationOutcome,
};
use crate::domain::foundation::{Timestamp, TurnId, UserId};
use crate::ports::ConversationStore;

use super::{EngineReplies, TurnOutcome, TurnResponse};
use crate::application::handlers::SharedRegistry;

/// Anti-spam and retry limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSettings {
    /// Minimum gap between two messages from the same user.
    pub debounce_window: Duration,
    /// Consecutive failures tolerated before the session is reset.
    pub max_attempts: u32,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(2_000),
            max_attempts: 3,
        }
    }
}

/// A reply before the session-dependent fields are filled in.
struct Reply {
    text: String,
    options: Vec<String>,
    terminal: bool,
    outcome: TurnOutcome,
}

/// Drives conversations through the step graph.
pub struct TurnOrchestrator {
    registry: SharedRegistry,
    store: Arc<dyn ConversationStore>,
    sanitizer: InputSanitizer,
    renderer: StepRenderer,
    replies: EngineReplies,
    settings: TurnSettings,
}

impl TurnOrchestrator {
    pub fn new(registry: SharedRegistry, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            registry,
            store,
            sanitizer: InputSanitizer::default(),
            renderer: StepRenderer::default(),
            replies: EngineReplies::default(),
            settings: TurnSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TurnSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: InputSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn with_renderer(mut self, renderer: StepRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_replies(mut self, replies: EngineReplies) -> Self {
        self.replies = replies;
        self
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    pub fn replies(&self) -> &EngineReplies {
        &self.replies
    }

    /// Processes one inbound message at the current time.
    pub async fn process_turn(&self, user_id: &UserId, raw_text: &str) -> TurnResponse {
        self.process_turn_at(user_id, raw_text, Timestamp::now()).await
    }

    /// Processes one inbound message as if it arrived at `now`.
    pub async fn process_turn_at(
        &self,
        user_id: &UserId,
        raw_text: &str,
        now: Timestamp,
    ) -> TurnResponse {
        let span = info_span!("turn", user_id = %user_id, turn_id = %TurnId::new());
        self.run_turn(user_id, raw_text, now).instrument(span).await
    }

    async fn run_turn(&self, user_id: &UserId, raw_text: &str, now: Timestamp) -> TurnResponse {
        let input = self.sanitizer.sanitize(raw_text);
        let registry = self.registry.read().await;
        let mut conversation = self.store.checkout(user_id, now).await;

        conversation.log_incoming(input.clone(), now);

        if conversation.is_debounced(self.settings.debounce_window) {
            debug!("Message arrived inside the debounce window");
            return TurnResponse {
                text: self.replies.debounce.clone(),
                options: Vec::new(),
                terminal: false,
                data: None,
                step: conversation.current_step().clone(),
                outcome: TurnOutcome::Debounced,
            };
        }

        let reply = match ControlCommand::classify(&input) {
            Some(ControlCommand::Restart) => {
                conversation.restart(now);
                self.render(
                    registry.entry_step(),
                    Some(self.replies.restart_banner.as_str()),
                    TurnOutcome::Restarted,
                )
            }
            Some(ControlCommand::Back) if back_allowed(&registry, &conversation) => {
                self.go_back(&registry, &mut conversation, now)
            }
            _ => self.advance(&registry, &mut conversation, user_id, &input, now),
        };

        if conversation.is_repeated_outgoing(&reply.text) {
            debug!("Reply repeats a recent one, not logging it");
        } else {
            conversation.log_outgoing(reply.text.clone(), now);
        }

        let session = conversation.session();
        debug!(
            outcome = ?reply.outcome,
            step = %session.current_step(),
            attempts = session.attempts(),
            "Turn processed"
        );

        TurnResponse {
            text: reply.text,
            options: reply.options,
            terminal: reply.terminal,
            data: (!session.context().is_empty()).then(|| session.context().clone()),
            step: session.current_step().clone(),
            outcome: reply.outcome,
        }
    }

    fn go_back(
        &self,
        registry: &StepRegistry,
        conversation: &mut Conversation,
        now: Timestamp,
    ) -> Reply {
        if !conversation.go_back() {
            let options = registry
                .get(conversation.current_step())
                .map(|step| self.renderer.render(step).lines)
                .unwrap_or_default();
            return Reply {
                text: self.replies.cannot_go_back.clone(),
                options,
                terminal: false,
                outcome: TurnOutcome::BackUnavailable,
            };
        }

        match registry.get(conversation.current_step()) {
            Some(step) => self.render(step, Some(self.replies.back_banner.as_str()), TurnOutcome::WentBack),
            None => self.recover(registry, conversation, now, "previous step is no longer registered"),
        }
    }

    fn advance(
        &self,
        registry: &StepRegistry,
        conversation: &mut Conversation,
        user_id: &UserId,
        input: &str,
        now: Timestamp,
    ) -> Reply {
        let Some(step) = registry.get(conversation.current_step()) else {
            return self.recover(registry, conversation, now, "current step is no longer registered");
        };

        // An unrecognized opening message just brings up the menu.
        if conversation.session().is_pristine() && parse_positive_integer(input).is_none() {
            return self.render(step, None, TurnOutcome::MenuRepeated);
        }

        if let Some(rule) = step.validation() {
            if let ValidationOutcome::Rejected { reason } = validate(input, rule) {
                return self.fail(registry, conversation, step, reason, now);
            }
        }

        if let Some(action) = step.action() {
            let call = ActionInput {
                user_id,
                step_id: step.id(),
                input,
            };
            if let Err(e) = action.execute(&call, conversation.session_mut().context_mut()) {
                error!(step = %step.id(), action = action.name(), error = %e, "Step action failed");
                conversation.reset_session(now);
                return self.render(
                    registry.entry_step(),
                    Some(self.replies.something_went_wrong.as_str()),
                    TurnOutcome::Recovered,
                );
            }
        }

        match registry.resolve_transition(step, input, conversation.session()) {
            Resolution::Target(target) => match registry.get(&target) {
                Some(next) => {
                    conversation.move_to(target);
                    self.render(next, None, TurnOutcome::Advanced)
                }
                None => {
                    warn!(from = %step.id(), to = %target, "Transition targets an unregistered step");
                    self.recover(registry, conversation, now, "unresolved transition")
                }
            },
            Resolution::NoMatch => {
                let hint = self.replies.retry_hint(conversation.session().attempts() + 1);
                let hint = hint.to_string();
                self.fail(registry, conversation, step, hint, now)
            }
            Resolution::Unroutable => {
                warn!(step = %step.id(), "Step has no way to route input");
                self.recover(registry, conversation, now, "step has no transition")
            }
        }
    }

    /// Counts a failed input; resets the session once the ceiling is hit.
    fn fail(
        &self,
        registry: &StepRegistry,
        conversation: &mut Conversation,
        step: &StepDefinition,
        message: String,
        now: Timestamp,
    ) -> Reply {
        let attempts = conversation.increment_attempts();
        if attempts >= self.settings.max_attempts {
            debug!(attempts, "Attempt ceiling reached, resetting session");
            conversation.reset_session(now);
            return self.render(
                registry.entry_step(),
                Some(self.replies.attempts_exhausted.as_str()),
                TurnOutcome::AttemptsExhausted,
            );
        }
        self.render(step, Some(message.as_str()), TurnOutcome::Retry)
    }

    fn recover(
        &self,
        registry: &StepRegistry,
        conversation: &mut Conversation,
        now: Timestamp,
        cause: &str,
    ) -> Reply {
        warn!(step = %conversation.current_step(), cause, "Resetting session to the entry step");
        conversation.reset_session(now);
        self.render(
            registry.entry_step(),
            Some(self.replies.something_went_wrong.as_str()),
            TurnOutcome::Recovered,
        )
    }

    fn render(&self, step: &StepDefinition, banner: Option<&str>, outcome: TurnOutcome) -> Reply {
        let rendered = self.renderer.render(step);
        Reply {
            text: rendered.text(banner),
            options: rendered.lines,
            terminal: rendered.terminal,
            outcome,
        }
    }
}

/// Steps missing from the registry do not block a back command.
fn back_allowed(registry: &StepRegistry, conversation: &Conversation) -> bool {
    registry
        .get(conversation.current_step())
        .map(StepDefinition::allows_back)
        .unwrap_or(true)
}
