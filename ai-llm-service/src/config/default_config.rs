//! Default LLM configs loaded from environment variables.
//!
//! Three roles are exposed, all sharing one provider selected by `LLM_PROVIDER`:
//!
//! - **Generation** → trivia authoring (higher temperature, longer timeout)
//! - **Normalizer** → short prompt cleanup (low temperature, tight timeout)
//! - **Embedding**  → query vectors for retrieval
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`            = `openai` (default) | `ollama`
//! - `LLM_MAX_TOKENS`          = optional max tokens (u32) for generation
//! - `GENERATION_MODEL`        = generation model
//! - `NORMALIZER_MODEL`        = normalizer model (defaults to the generation model)
//! - `EMBEDDING_MODEL`         = embedding model
//! - `GENERATION_TIMEOUT_SECS` = default 20
//! - `NORMALIZER_TIMEOUT_SECS` = default 8 (also bounds embedding calls)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`  = API key; absence is reported per call, not at startup
//! - `OPENAI_BASE_URL` = default `https://api.openai.com`
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint, default `http://localhost:11434`

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_u32, env_u64_or, validate_http_endpoint,
    },
};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Reads `LLM_PROVIDER`, defaulting to OpenAI.
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for unknown values.
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    match env_opt("LLM_PROVIDER") {
        Some(raw) => Ok(raw.parse::<LlmProvider>()?),
        None => Ok(LlmProvider::OpenAI),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_opt("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
    validate_http_endpoint("OPENAI_BASE_URL", &url)?;
    Ok(url)
}

fn endpoint_for(provider: LlmProvider) -> Result<String, AiLlmError> {
    match provider {
        LlmProvider::OpenAI => openai_endpoint(),
        LlmProvider::Ollama => ollama_endpoint(),
    }
}

fn api_key_for(provider: LlmProvider) -> Option<String> {
    match provider {
        LlmProvider::OpenAI => env_opt("OPENAI_API_KEY"),
        LlmProvider::Ollama => None,
    }
}

fn default_generation_model(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::OpenAI => "gpt-4o-mini",
        LlmProvider::Ollama => "llama3.1:8b",
    }
}

fn default_embedding_model(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::OpenAI => "text-embedding-3-small",
        LlmProvider::Ollama => "nomic-embed-text",
    }
}

fn generation_model(provider: LlmProvider) -> String {
    env_opt("GENERATION_MODEL").unwrap_or_else(|| default_generation_model(provider).to_string())
}

/// Config for the **generation** profile.
///
/// # Defaults
/// - `temperature = Some(0.7)`
/// - `timeout_secs = GENERATION_TIMEOUT_SECS` or 20
pub fn config_generation() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    Ok(LlmModelConfig {
        provider,
        model: generation_model(provider),
        endpoint: endpoint_for(provider)?,
        api_key: api_key_for(provider),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.7),
        top_p: None,
        timeout_secs: Some(env_u64_or("GENERATION_TIMEOUT_SECS", 20)?),
    })
}

/// Config for the **normalizer** profile.
///
/// # Defaults
/// - `model` = `NORMALIZER_MODEL`, else the generation model
/// - `temperature = Some(0.1)`, `max_tokens = Some(100)`
/// - `timeout_secs = NORMALIZER_TIMEOUT_SECS` or 8
pub fn config_normalizer() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    Ok(LlmModelConfig {
        provider,
        model: env_opt("NORMALIZER_MODEL").unwrap_or_else(|| generation_model(provider)),
        endpoint: endpoint_for(provider)?,
        api_key: api_key_for(provider),
        max_tokens: Some(100),
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(env_u64_or("NORMALIZER_TIMEOUT_SECS", 8)?),
    })
}

/// Config for the **embedding** profile.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    Ok(LlmModelConfig {
        provider,
        model: env_opt("EMBEDDING_MODEL")
            .unwrap_or_else(|| default_embedding_model(provider).to_string()),
        endpoint: endpoint_for(provider)?,
        api_key: api_key_for(provider),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(env_u64_or("NORMALIZER_TIMEOUT_SECS", 8)?),
    })
}
