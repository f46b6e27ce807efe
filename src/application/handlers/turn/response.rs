//! Turn responses returned to the transport.

use serde::Serialize;

use crate::domain::conversation::ContextData;
use crate::domain::foundation::StepId;

/// How a turn ended. Diagnostic only; the text is what users see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Moved to a new step (or stayed on a step that points to itself).
    Advanced,
    WentBack,
    Restarted,
    /// Arrived too soon after the previous message; nothing changed.
    Debounced,
    /// Input rejected; the user stays on the step.
    Retry,
    /// Too many rejected inputs; the session was reset.
    AttemptsExhausted,
    /// A broken flow or failed action; the session was reset.
    Recovered,
    /// Unrecognized first message; the menu is shown again.
    MenuRepeated,
    /// Back requested with empty history.
    BackUnavailable,
}

/// Reply to one inbound message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResponse {
    /// Complete reply: banner, step message and option lines.
    pub text: String,
    /// Option lines and control hints, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub terminal: bool,
    /// The session's context bag, when it holds anything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ContextData>,
    /// Step the user is at after the turn.
    pub step: StepId,
    pub outcome: TurnOutcome,
}
