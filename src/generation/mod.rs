mod gemini;

use futures_util::future::BoxFuture;
use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("generation service returned no text")]
    EmptyResponse,
}

/// One request, one reply. Implementations must not retry.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerationError>>;
}
