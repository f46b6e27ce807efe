//! Conversation engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Limits and timings of the conversation engine
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum gap between two messages from one user
    #[serde(default = "default_debounce_window_ms")]
    pub debounce_window_ms: u64,

    /// Consecutive invalid inputs before a reset
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Idle time before a conversation is evicted
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,

    /// How often the reaper sweeps
    #[serde(default = "default_reaper_interval_ms")]
    pub reaper_interval_ms: u64,

    /// Message log entries kept per user
    #[serde(default = "default_message_log_cap")]
    pub message_log_cap: usize,

    /// Inbound messages are cut to this many characters
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

impl EngineConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_millis(self.reaper_interval_ms)
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::MustBePositive("engine.max_attempts"));
        }
        if self.message_log_cap == 0 {
            return Err(ValidationError::MustBePositive("engine.message_log_cap"));
        }
        if self.max_input_chars == 0 {
            return Err(ValidationError::MustBePositive("engine.max_input_chars"));
        }
        if self.session_timeout_ms == 0 {
            return Err(ValidationError::MustBePositive("engine.session_timeout_ms"));
        }
        if self.reaper_interval_ms == 0 {
            return Err(ValidationError::MustBePositive("engine.reaper_interval_ms"));
        }
        if self.reaper_interval_ms > self.session_timeout_ms {
            return Err(ValidationError::ReaperSlowerThanTimeout);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: default_debounce_window_ms(),
            max_attempts: default_max_attempts(),
            session_timeout_ms: default_session_timeout_ms(),
            reaper_interval_ms: default_reaper_interval_ms(),
            message_log_cap: default_message_log_cap(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

fn default_debounce_window_ms() -> u64 {
    2_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_session_timeout_ms() -> u64 {
    1_800_000
}

fn default_reaper_interval_ms() -> u64 {
    300_000
}

fn default_message_log_cap() -> usize {
    50
}

fn default_max_input_chars() -> usize {
    1_000
}
