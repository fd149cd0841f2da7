//! Typed error for the trivia-engine crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriviaError {
    /// Parsed output lacks a `data` array or a question is malformed.
    #[error("generation schema error: {0}")]
    GenerationSchema(String),

    /// `data` does not hold exactly five questions.
    #[error("generation count error: expected 5 questions, got {0}")]
    GenerationCount(usize),

    /// No balanced `{...}` span in the model output.
    #[error("no JSON object found in generation output")]
    JsonNotFound,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Model call failed (transport, provider, timeout).
    #[error("generation backend error: {0}")]
    Backend(#[from] AiLlmError),

    /// A response about to leave the pipeline breaks the question-set shape.
    #[error("trivia invariant violated: {0}")]
    Invariant(String),
}
