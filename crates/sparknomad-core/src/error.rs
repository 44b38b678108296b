//! Error types for name generation

use thiserror::Error;

/// The one message shown to users, whatever went wrong
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate names. Please try again.";

/// Result type alias for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Everything that can go wrong while asking the model for names
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No Gemini API key configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No response generated")]
    EmptyResponse,

    #[error("Failed to parse generated names: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GenerationError {
    /// Transient and permanent failures are not distinguished for the user.
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_MESSAGE
    }
}
