//! Errors surfaced by the store, the collaborators and the workbench

use promptcore::PromptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollError {
    /// Template, codec or file error from the core
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl RollError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Prompt(PromptError::NotFound(what.into()))
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        Self::Prompt(PromptError::Invalid(what.into()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Prompt(PromptError::NotFound(_)))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Prompt(e) if e.is_decode())
    }
}

pub type RollResult<T> = Result<T, RollError>;
