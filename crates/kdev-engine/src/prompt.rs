//! Confirmation seam for destructive commands

pub trait Prompt {
    /// Ask a yes/no question; `true` means proceed
    fn confirm(&self, question: &str) -> bool;
}

/// Fixed answer, for tests and non-interactive callers
#[derive(Debug, Clone, Copy)]
pub struct StaticPrompt(pub bool);

impl Prompt for StaticPrompt {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!(question, answer = self.0, "static confirmation");
        self.0
    }
}
