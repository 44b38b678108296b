pub mod config;
pub mod error;
pub mod gemini;
pub mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::{GenerationError, GenerationResult, GENERATION_FAILED_MESSAGE};
pub use gemini::GeminiClient;
pub use types::{GenerationResponse, LoadingState, StartupName};
