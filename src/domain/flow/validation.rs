//! Validation engine - stateless input checks attached to steps.
//!
//! `validate` is a pure function of the raw input and the rule; it never
//! touches sessions or the registry.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What kind of value a step expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Number,
    #[default]
    Text,
    Email,
    Phone,
    /// Option-range checking belongs to transition resolution.
    Option,
    Custom,
}

/// Caller-supplied predicate for [`RuleKind::Custom`] rules.
pub type CustomPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Input constraints for a step.
#[derive(Clone, Default)]
pub struct ValidationRule {
    pub kind: RuleKind,
    /// `None` behaves like `Some(true)`: only an explicit `false` allows empty input.
    pub required: Option<bool>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub custom: Option<CustomPredicate>,
    pub error_text: Option<String>,
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(|r| r.as_str()))
            .field("custom", &self.custom.is_some())
            .field("error_text", &self.error_text)
            .finish()
    }
}

impl ValidationRule {
    /// Creates a rule of the given kind with no extra constraints.
    pub fn of_kind(kind: RuleKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Creates a custom rule delegating to `predicate`.
    pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            kind: RuleKind::Custom,
            custom: Some(Arc::new(predicate)),
            ..Default::default()
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }

    fn is_required(&self) -> bool {
        self.required != Some(false)
    }

    fn reject(&self, default_reason: impl Into<String>) -> ValidationOutcome {
        ValidationOutcome::Rejected {
            reason: self
                .error_text
                .clone()
                .unwrap_or_else(|| default_reason.into()),
        }
    }
}

/// Result of validating one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected { reason: String },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Accepted => None,
            ValidationOutcome::Rejected { reason } => Some(reason),
        }
    }
}

/// Validates `raw` against `rule`, stopping at the first failure.
///
/// # Order of checks
/// 1. Empty input (only when required)
/// 2. Length bounds on the trimmed input
/// 3. Kind-specific format
/// 4. Pattern, regardless of kind
/// 5. Custom predicate
pub fn validate(raw: &str, rule: &ValidationRule) -> ValidationOutcome {
    let input = raw.trim();

    if input.is_empty() {
        return if rule.is_required() {
            rule.reject("This field is required.")
        } else {
            ValidationOutcome::Accepted
        };
    }

    let length = input.chars().count();
    if let Some(min) = rule.min_length {
        if length < min {
            return rule.reject(format!("Please enter at least {} characters.", min));
        }
    }
    if let Some(max) = rule.max_length {
        if length > max {
            return rule.reject(format!("Please enter at most {} characters.", max));
        }
    }

    let kind_ok = match rule.kind {
        RuleKind::Number => is_number(input),
        RuleKind::Email => is_email(input),
        RuleKind::Phone => is_phone(input),
        RuleKind::Option | RuleKind::Text | RuleKind::Custom => true,
    };
    if !kind_ok {
        return rule.reject(default_kind_reason(rule.kind));
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(input) {
            return rule.reject("The value does not have the expected format.");
        }
    }

    if rule.kind == RuleKind::Custom {
        if let Some(predicate) = &rule.custom {
            if !predicate(input) {
                return rule.reject(default_kind_reason(RuleKind::Custom));
            }
        }
    }

    ValidationOutcome::Accepted
}

fn default_kind_reason(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Number => "Please enter a valid number.",
        RuleKind::Email => "Please enter a valid email address.",
        RuleKind::Phone => "Please enter a valid phone number with 8 to 11 digits.",
        RuleKind::Custom => "The value entered is not valid.",
        RuleKind::Option | RuleKind::Text => "The value entered is not valid.",
    }
}

fn is_number(input: &str) -> bool {
    input.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false)
}

fn is_email(input: &str) -> bool {
    let mut parts = input.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

fn is_phone(input: &str) -> bool {
    let digits = input.chars().filter(|c| c.is_ascii_digit()).count();
    (8..=11).contains(&digits)
}
