//! Shared LLM service with three profiles: `generation`, `normalizer`, `embedding`.
//!
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key).
//! - Client construction is lazy; a misconfigured provider (e.g. no API key)
//!   fails the individual call instead of the process.
//! - Each call is bounded by its profile's timeout.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmServiceProfiles, Profile, TextGenerator};
//!
//! # async fn run() -> ai_llm_service::Result<()> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//! let generator = svc.client(Profile::Generation);
//! let txt = generator.generate("Name three IPL teams.", None).await?;
//! println!("{txt}");
//! # Ok(()) }
//! ```

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    config::{
        default_config::{config_embedding, config_generation, config_normalizer},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::{AiLlmError, Result},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
    traits::{Embedder, TextGenerator},
};

/// Logical role of a model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Generation,
    Normalizer,
    Embedding,
}

pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    normalizer: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    /// Creates a new service.
    ///
    /// If `normalizer_opt` is `None`, the normalizer reuses the generation profile.
    pub fn new(
        generation: LlmModelConfig,
        normalizer_opt: Option<LlmModelConfig>,
        embedding: LlmModelConfig,
    ) -> Self {
        let normalizer = normalizer_opt.unwrap_or_else(|| generation.clone());
        Self {
            generation,
            normalizer,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Builds all three profiles from the environment.
    pub fn from_env() -> Result<Self> {
        let generation = config_generation()?;
        let normalizer = config_normalizer()?;
        let embedding = config_embedding()?;

        if generation.provider == LlmProvider::OpenAI && generation.api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; model calls will fail and fallbacks will be served");
        }

        Ok(Self::new(generation, Some(normalizer), embedding))
    }

    pub fn profile(&self, profile: Profile) -> &LlmModelConfig {
        match profile {
            Profile::Generation => &self.generation,
            Profile::Normalizer => &self.normalizer,
            Profile::Embedding => &self.embedding,
        }
    }

    /// `true` when the generation profile has everything it needs to attempt a call.
    pub fn generation_configured(&self) -> bool {
        match self.generation.provider {
            LlmProvider::OpenAI => self.generation.api_key.is_some(),
            LlmProvider::Ollama => true,
        }
    }

    /// Returns a [`TextGenerator`] bound to `profile`.
    pub fn client(self: &Arc<Self>, profile: Profile) -> ProfileClient {
        ProfileClient {
            profiles: Arc::clone(self),
            profile,
        }
    }

    /// Generates text with the given profile, bounded by its timeout.
    pub async fn generate(
        &self,
        profile: Profile,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String> {
        let cfg = self.profile(profile);
        debug!(?profile, model = %cfg.model, prompt_len = prompt.len(), "generate");
        with_timeout(cfg.timeout(), async {
            match cfg.provider {
                LlmProvider::Ollama => self.ollama_for(cfg).await?.generate(prompt, system).await,
                LlmProvider::OpenAI => self.openai_for(cfg).await?.generate(prompt, system).await,
            }
        })
        .await
    }

    /// Computes an embedding with the embedding profile, bounded by its timeout.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let cfg = &self.embedding;
        with_timeout(cfg.timeout(), async {
            match cfg.provider {
                LlmProvider::Ollama => self.ollama_for(cfg).await?.embeddings(input).await,
                LlmProvider::OpenAI => self.openai_for(cfg).await?.embeddings(input).await,
            }
        })
        .await
    }

    /* --------------------- Internals --------------------- */

    async fn ollama_for(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key) {
            return Ok(Arc::clone(cli));
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, Arc::clone(&cli));
        Ok(cli)
    }

    async fn openai_for(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key) {
            return Ok(Arc::clone(cli));
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, Arc::clone(&cli));
        Ok(cli)
    }
}

#[async_trait]
impl Embedder for LlmServiceProfiles {
    async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        LlmServiceProfiles::embed(self, input).await
    }
}

/// Cheap handle that routes [`TextGenerator`] calls to one profile.
#[derive(Clone)]
pub struct ProfileClient {
    profiles: Arc<LlmServiceProfiles>,
    profile: Profile,
}

#[async_trait]
impl TextGenerator for ProfileClient {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        self.profiles.generate(self.profile, prompt, system).await
    }
}

/// Runs `fut`, turning an elapsed `limit` into [`AiLlmError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis(), "LLM call timed out");
            Err(AiLlmError::Timeout(limit))
        }
    }
}

/// Cache key identifying one client configuration.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
        }
    }
}
