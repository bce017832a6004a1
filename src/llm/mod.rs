pub mod gemini;

use async_trait::async_trait;
use reqwest::StatusCode;

pub use gemini::GeminiClient;

/// A generation service reached over the network, one call per request.
///
/// The production implementation is [`GeminiClient`]; handlers only see this
/// trait so tests can swap in a canned backend.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send a prompt to the text model and return its flattened text output.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Send a prompt to the image model and return the raw bytes of the
    /// first inline image part.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, GenerationError>;
}

/// Failure modes of a single generation attempt. Nothing here is retried;
/// the caller turns any of these into one error response.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request never produced a usable response (transport failure,
    /// timeout, undecodable body).
    #[error("Generation request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status. `detail` carries the
    /// upstream error message so the client sees what went wrong.
    #[error("Generation service returned status {status}: {detail}")]
    Api { status: StatusCode, detail: String },

    /// The model replied, but without an inline image part. The detail is
    /// whatever text the model sent back instead, e.g. a refusal.
    #[error("API did not generate an image. It responded with: \"{0}\"")]
    ImageNotGenerated(String),
}
