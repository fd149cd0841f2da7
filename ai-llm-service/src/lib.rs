//! Shared LLM access layer.
//!
//! - [`service_profiles::LlmServiceProfiles`] holds three logical profiles
//!   (`generation`, `normalizer`, `embedding`) and caches one HTTP client per
//!   distinct provider config.
//! - Every outbound call is bounded by the profile timeout; an elapsed timeout
//!   surfaces as [`AiLlmError::Timeout`] like any other call failure.
//! - Consumers depend on the [`TextGenerator`] / [`Embedder`] traits so that
//!   tests can swap in stubs.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod traits;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind, Result};
pub use service_profiles::{LlmServiceProfiles, Profile, ProfileClient};
pub use traits::{Embedder, TextGenerator};
