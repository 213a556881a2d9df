//! Prompt rendering errors.

use thiserror::Error;

/// Prompt errors.
#[derive(Debug, Error)]
pub enum PromptError {
    /// No prompt is registered under this name.
    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),

    /// A required argument was not supplied or was blank.
    #[error("prompt {prompt} requires argument {argument}")]
    MissingArgument {
        prompt: &'static str,
        argument: &'static str,
    },

    /// Template syntax or rendering failure.
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

/// Result alias for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;
