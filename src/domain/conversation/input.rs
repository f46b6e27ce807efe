//! Inbound text normalization and control keyword detection.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default maximum length (in chars) of a sanitized inbound message.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1_000;

const BACK_KEYWORDS: &[&str] = &["0", "voltar", "back", "anterior"];

const RESTART_KEYWORDS: &[&str] = &[
    "#",
    "inicio",
    "início",
    "recomecar",
    "recomeçar",
    "restart",
    "start",
];

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));

static SCRIPT_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:javascript|vbscript)\s*:").expect("valid regex"));

static EVENT_HANDLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bon[a-z]+\s*=").expect("valid regex"));

/// Normalizes raw inbound text before it reaches the engine.
///
/// Output is safe to echo back to chat renderers. It is not a security
/// boundary.
#[derive(Debug, Clone)]
pub struct InputSanitizer {
    max_chars: usize,
}

impl InputSanitizer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Sanitizes inbound text.
    ///
    /// # Steps
    /// 1. Drop `<script>` blocks and control characters
    /// 2. Strip angle brackets, script protocols and inline event handlers
    /// 3. Trim and cap the length
    pub fn sanitize(&self, raw: &str) -> String {
        let without_blocks = SCRIPT_BLOCK.replace_all(raw, "");

        let cleaned: String = without_blocks
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .filter(|c| *c != '<' && *c != '>')
            .collect();

        let cleaned = SCRIPT_PROTOCOL.replace_all(&cleaned, "");
        let cleaned = EVENT_HANDLER.replace_all(&cleaned, "");

        cleaned.trim().chars().take(self.max_chars).collect::<String>().trim_end().to_string()
    }
}

impl Default for InputSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_CHARS)
    }
}

/// Navigation commands recognized at any step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Back,
    Restart,
}

impl ControlCommand {
    /// Classifies input as a control keyword.
    ///
    /// Matching is case-insensitive and exact: `"voltar agora"` is not a
    /// back command.
    pub fn classify(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        if BACK_KEYWORDS.contains(&normalized.as_str()) {
            Some(ControlCommand::Back)
        } else if RESTART_KEYWORDS.contains(&normalized.as_str()) {
            Some(ControlCommand::Restart)
        } else {
            None
        }
    }
}

/// Parses input as a strictly positive integer.
pub fn parse_positive_integer(input: &str) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<usize>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_trims_whitespace() {
        assert_eq!(InputSanitizer::default().sanitize("  1 \n"), "1");
    }

    #[test]
    fn sanitize_strips_angle_brackets() {
        assert_eq!(InputSanitizer::default().sanitize("a <b> c"), "a b c");
    }

    #[test]
    fn sanitize_removes_script_blocks() {
        let out = InputSanitizer::default().sanitize("hi<script>alert(1)</script> there");
        assert_eq!(out, "hi there");
    }

    #[test]
    fn sanitize_removes_script_protocols_and_handlers() {
        let out = InputSanitizer::default().sanitize("javascript:alert(1) img onerror=x");
        assert!(!out.to_lowercase().contains("javascript:"));
        assert!(!out.contains("onerror="));
    }

    #[test]
    fn sanitize_caps_length() {
        let out = InputSanitizer::new(10).sanitize(&"a".repeat(50));
        assert_eq!(out.chars().count(), 10);
    }

    #[test]
    fn sanitize_keeps_plain_text_untouched() {
        let out = InputSanitizer::default().sanitize("ana.souza@example.com");
        assert_eq!(out, "ana.souza@example.com");
    }

    #[test]
    fn classify_recognizes_back_keywords_case_insensitively() {
        for input in ["0", "voltar", "BACK", " Anterior "] {
            assert_eq!(ControlCommand::classify(input), Some(ControlCommand::Back), "{input}");
        }
    }

    #[test]
    fn classify_recognizes_restart_keywords() {
        for input in ["#", "inicio", "Recomecar", "restart", "START"] {
            assert_eq!(ControlCommand::classify(input), Some(ControlCommand::Restart), "{input}");
        }
    }

    #[test]
    fn classify_requires_exact_match() {
        assert_eq!(ControlCommand::classify("voltar agora"), None);
        assert_eq!(ControlCommand::classify("restarting"), None);
        assert_eq!(ControlCommand::classify("00"), None);
    }

    #[test]
    fn parse_positive_integer_accepts_only_positive_digits() {
        assert_eq!(parse_positive_integer(" 2 "), Some(2));
        assert_eq!(parse_positive_integer("0"), None);
        assert_eq!(parse_positive_integer("-1"), None);
        assert_eq!(parse_positive_integer("+1"), None);
        assert_eq!(parse_positive_integer("1.5"), None);
        assert_eq!(parse_positive_integer("hello"), None);
        assert_eq!(parse_positive_integer(""), None);
    }
}
