// ABOUTME: Operator confirmation for guarded operations.
// ABOUTME: Injected into the deployer so tests can script the answer.

use crate::error::{Error, Result};

/// Asks the operator a yes/no question.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

/// Always gives the same answer. Used for `--dry-run`, where nothing is changed.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        tracing::debug!(prompt, answer = self.0, "confirmation answered without prompting");
        Ok(self.0)
    }
}
