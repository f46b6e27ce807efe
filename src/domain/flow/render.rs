//! Step rendering - turns a step into the text sent to the user.

use super::StepDefinition;

/// Labels used for control hints appended after a step's options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRenderer {
    pub back_hint: String,
    pub restart_hint: String,
}

impl Default for StepRenderer {
    fn default() -> Self {
        Self {
            back_hint: "0. Back".to_string(),
            restart_hint: "#. Restart".to_string(),
        }
    }
}

impl StepRenderer {
    /// Renders `step`: message text, numbered options in declaration
    /// order, then the back and restart hints unless the step disables
    /// them.
    pub fn render(&self, step: &StepDefinition) -> RenderedStep {
        let mut lines: Vec<String> = step
            .options()
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}. {}", i + 1, option.label))
            .collect();

        if step.allows_back() {
            lines.push(self.back_hint.clone());
        }
        if step.allows_restart() {
            lines.push(self.restart_hint.clone());
        }

        RenderedStep {
            message: step.text().to_string(),
            lines,
            terminal: step.is_terminal(),
        }
    }
}

/// A rendered step, before any banner is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStep {
    pub message: String,
    /// Option lines followed by control hints.
    pub lines: Vec<String>,
    pub terminal: bool,
}

impl RenderedStep {
    /// Full reply text, optionally prefixed with a banner.
    pub fn text(&self, banner: Option<&str>) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(3);
        if let Some(banner) = banner.filter(|b| !b.is_empty()) {
            blocks.push(banner.to_string());
        }
        blocks.push(self.message.clone());
        if !self.lines.is_empty() {
            blocks.push(self.lines.join("\n"));
        }
        blocks.join("\n\n")
    }
}
