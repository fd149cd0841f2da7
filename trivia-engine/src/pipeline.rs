//! Request orchestrator: normalize, retrieve, then generate enhanced or plain.
//!
//! Every stage failure selects the next stage explicitly, so [`TriviaPipeline::run`]
//! always produces a question set. The only error it returns is an
//! [`TriviaError::Invariant`] from the final shape check.

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::TextGenerator;
use serde::Serialize;
use sports_index::{IndexError, SearchProvider, SearchResult};
use tracing::{info, instrument, warn};

use crate::context::build_context;
use crate::error::TriviaError;
use crate::generator::TriviaGenerator;
use crate::normalizer::QueryNormalizer;
use crate::types::TriviaResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Gates both query normalization and retrieval.
    pub retrieval_enabled: bool,
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieval_enabled: true,
            top_k: 5,
        }
    }
}

/// Which generation path produced the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Plain,
    Enhanced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaOutcome {
    pub response: TriviaResponse,
    pub route: Route,
}

pub struct TriviaPipeline {
    normalizer: QueryNormalizer,
    generator: TriviaGenerator,
    search: Option<Arc<dyn SearchProvider>>,
    cfg: PipelineConfig,
}

impl TriviaPipeline {
    pub fn new(
        normalizer_llm: Arc<dyn TextGenerator>,
        generation_llm: Arc<dyn TextGenerator>,
        search: Option<Arc<dyn SearchProvider>>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            normalizer: QueryNormalizer::new(normalizer_llm),
            generator: TriviaGenerator::new(generation_llm),
            search,
            cfg,
        }
    }

    pub fn config(&self) -> PipelineConfig {
        self.cfg
    }

    /// Whether a retrieval backend is wired and enabled.
    pub fn retrieval_active(&self) -> bool {
        self.cfg.retrieval_enabled && self.search.is_some()
    }

    pub async fn generate(&self, prompt: &str) -> Result<TriviaResponse, TriviaError> {
        self.run(prompt).await.map(|o| o.response)
    }

    #[instrument(skip_all, fields(topic = %prompt.trim()))]
    pub async fn run(&self, prompt: &str) -> Result<TriviaOutcome, TriviaError> {
        let started = Instant::now();
        let topic = prompt.trim();

        let hits = self.retrieve(topic).await;
        let (response, route) = if hits.is_empty() {
            (self.generator.generate_plain(topic).await, Route::Plain)
        } else {
            let context = build_context(&hits);
            (
                self.generator.generate_enhanced(topic, &context).await,
                Route::Enhanced,
            )
        };

        response.ensure_valid()?;
        info!(
            route = ?route,
            latency_ms = started.elapsed().as_millis() as u64,
            "trivia ready"
        );
        Ok(TriviaOutcome { response, route })
    }

    /// Returns retrieved hits, or an empty list on every failure path.
    async fn retrieve(&self, topic: &str) -> Vec<SearchResult> {
        let search = match (&self.search, self.cfg.retrieval_enabled) {
            (Some(search), true) => search,
            _ => return Vec::new(),
        };

        let query = self.normalizer.normalize(topic).await;
        match search.search(&query, self.cfg.top_k).await {
            Ok(hits) => {
                info!(query = %query, hits = hits.len(), "retrieval finished");
                hits
            }
            Err(IndexError::NoIndex { collection }) => {
                warn!(
                    stage = "retrieval",
                    %collection,
                    "no index yet; run ingestion first. Using plain generation"
                );
                Vec::new()
            }
            Err(e) => {
                warn!(stage = "retrieval", error = %e, "retrieval failed; using plain generation");
                Vec::new()
            }
        }
    }
}
