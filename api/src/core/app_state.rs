use std::{sync::Arc, time::Instant};

use ai_llm_service::{Embedder, LlmServiceProfiles, Profile};
use sports_index::{SearchProvider, SportsIndex};
use tracing::{info, warn};
use trivia_engine::{PipelineConfig, TriviaPipeline};
use user_store::{InMemoryUserRepository, UserService};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers. Composed once at startup.
pub struct AppState {
    pub pipeline: TriviaPipeline,
    pub users: UserService,
    /// Reported by `/health` (from `APP_ENV`).
    pub environment: String,
    /// Whether the generation profile has the credentials it needs.
    pub generation_configured: bool,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        pipeline: TriviaPipeline,
        users: UserService,
        environment: impl Into<String>,
        generation_configured: bool,
    ) -> Self {
        Self {
            pipeline,
            users,
            environment: environment.into(),
            generation_configured,
            started_at: Instant::now(),
        }
    }

    /// Load shared state from environment variables.
    ///
    /// A missing generation API key is tolerated; retrieval problems
    /// (bad config, unreachable client setup) disable retrieval with a warning.
    pub fn from_env() -> Result<Self, AppError> {
        let profiles = Arc::new(LlmServiceProfiles::from_env()?);
        let embedder: Arc<dyn Embedder> = profiles.clone();

        let (search, cfg) = match SportsIndex::from_env(embedder) {
            Ok(index) => {
                let retrieval = &index.config().retrieval;
                let cfg = PipelineConfig {
                    retrieval_enabled: retrieval.enabled,
                    top_k: retrieval.top_k,
                };
                (Some(Arc::new(index) as Arc<dyn SearchProvider>), cfg)
            }
            Err(e) => {
                warn!(error = %e, "retrieval disabled: index unavailable");
                let cfg = PipelineConfig {
                    retrieval_enabled: false,
                    ..PipelineConfig::default()
                };
                (None, cfg)
            }
        };

        let pipeline = TriviaPipeline::new(
            Arc::new(profiles.client(Profile::Normalizer)),
            Arc::new(profiles.client(Profile::Generation)),
            search,
            cfg,
        );
        info!(
            retrieval = pipeline.retrieval_active(),
            generation_model = %profiles.profile(Profile::Generation).model,
            "trivia pipeline ready"
        );

        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let users = UserService::new(Arc::new(InMemoryUserRepository::seeded()));

        Ok(Self::new(
            pipeline,
            users,
            environment,
            profiles.generation_configured(),
        ))
    }
}
