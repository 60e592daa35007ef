//! Command errors and error rendering

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::{PriorityError, RefError};
use crate::resolve::ResolveError;

/// A command-level failure with a machine-readable code
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandError {
    pub code: &'static str,
    pub message: String,
    pub hints: Vec<String>,
}

impl CommandError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn confirmation_required(action: &str) -> Self {
        Self::new("CONFIRMATION_REQUIRED", format!("Use --yes to confirm {}.", action))
    }
}

impl From<PriorityError> for CommandError {
    fn from(err: PriorityError) -> Self {
        Self::new("INVALID_PRIORITY", err.to_string())
    }
}

fn coded(code: &str, message: &str, hints: &[String]) -> String {
    let mut text = format!("Error: {}: {}", code, message);
    for hint in hints {
        text.push_str("\n  ");
        text.push_str(hint);
    }
    text
}

/// Renders an error for the terminal.
///
/// Errors that carry a code are shown as `Error: CODE: message` followed by
/// indented hints; anything else falls back to the full context chain.
pub fn format_error(err: &anyhow::Error) -> String {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<RefError>() {
            return coded(&e.code(), &e.to_string(), &e.hints());
        }
        if let Some(ResolveError::Ref(e)) = cause.downcast_ref::<ResolveError>() {
            return coded(&e.code(), &e.to_string(), &e.hints());
        }
        if let Some(e) = cause.downcast_ref::<CommandError>() {
            return coded(e.code, &e.message, &e.hints);
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return coded(e.code(), &e.to_string(), &e.hints());
        }
    }
    format!("Error: {:#}", err)
}
