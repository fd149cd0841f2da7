//! Unified error type for the sports-index crate.

use thiserror::Error;

/// Errors produced by the vector index, the renderer pipeline, and ingestion.
#[derive(Debug, Error)]
pub enum IndexError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O & filesystem ────────────────────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // ── JSON / serialization ────────────────────────────────────────────────
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Qdrant client / transport ───────────────────────────────────────────
    #[error("qdrant error: {0}")]
    Qdrant(String),

    // ── Embeddings backend ──────────────────────────────────────────────────
    #[error("embedding error: {0}")]
    Embedding(String),

    // ── Index lifecycle ─────────────────────────────────────────────────────
    /// The collection does not exist yet. Distinct from "no matches".
    #[error("no index found (collection '{collection}'). Please run ingestion first.")]
    NoIndex { collection: String },

    /// Ingestion found nothing renderable under the chunks directory.
    #[error("no records found in data directories under {dir}")]
    EmptyIngest { dir: String },
}

impl From<ai_llm_service::AiLlmError> for IndexError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        IndexError::Embedding(e.to_string())
    }
}
