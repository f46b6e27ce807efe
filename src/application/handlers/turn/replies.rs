//! Fixed replies the engine sends on its own behalf.

/// Engine-authored texts. Step texts come from the flow; these cover
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReplies {
    pub debounce: String,
    pub back_banner: String,
    pub restart_banner: String,
    pub cannot_go_back: String,
    pub retry_generic: String,
    pub retry_numeric: String,
    pub retry_final: String,
    pub attempts_exhausted: String,
    pub something_went_wrong: String,
}

impl Default for EngineReplies {
    fn default() -> Self {
        Self {
            debounce: "Please wait a moment before sending another message.".to_string(),
            back_banner: "Going back.".to_string(),
            restart_banner: "Starting over.".to_string(),
            cannot_go_back: "You are already at the beginning, there is nowhere to go back to."
                .to_string(),
            retry_generic: "Sorry, I didn't understand that. Please choose one of the options below."
                .to_string(),
            retry_numeric: "Please reply with just the number of the option you want.".to_string(),
            retry_final: "Last try: reply with one of the option numbers or we will start over."
                .to_string(),
            attempts_exhausted: "Too many invalid attempts. Let's start over.".to_string(),
            something_went_wrong: "Something went wrong on our side. Let's start over.".to_string(),
        }
    }
}

impl EngineReplies {
    /// Hint for the `attempts`-th consecutive unmatched input.
    pub fn retry_hint(&self, attempts: u32) -> &str {
        match attempts {
            0 | 1 => &self.retry_generic,
            2 => &self.retry_numeric,
            _ => &self.retry_final,
        }
    }
}
