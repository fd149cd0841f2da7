//! Seams between the LLM layer and its consumers.

use async_trait::async_trait;

use crate::error_handler::Result;

/// Produces free-form text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` (plus an optional system instruction) and returns the raw reply.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String>;
}

/// Maps a text to a dense vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, input: &str) -> Result<Vec<f32>>;
}
