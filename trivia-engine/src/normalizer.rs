//! Query normalizer: best-effort LLM rewrite of the user query.

use std::sync::Arc;

use ai_llm_service::TextGenerator;
use tracing::{debug, warn};

use crate::prompt::{NORMALIZER_SYSTEM, build_normalizer_prompt};

pub struct QueryNormalizer {
    llm: Arc<dyn TextGenerator>,
}

impl QueryNormalizer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Returns the cleaned query, or the trimmed input when the call fails
    /// or yields nothing usable. Never errors.
    pub async fn normalize(&self, query: &str) -> String {
        let original = query.trim();
        match self
            .llm
            .generate(&build_normalizer_prompt(original), Some(NORMALIZER_SYSTEM))
            .await
        {
            Ok(reply) => match clean_reply(&reply) {
                Some(cleaned) => {
                    debug!(original = %original, cleaned = %cleaned, "query normalized");
                    cleaned
                }
                None => {
                    warn!(original = %original, "normalizer returned empty text; using raw query");
                    original.to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, "normalizer failed; using raw query");
                original.to_string()
            }
        }
    }
}

/// First non-empty line, without surrounding quotes or a leading label.
fn clean_reply(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line
        .strip_prefix("Rewritten query:")
        .map(str::trim)
        .unwrap_or(line);
    let line = line.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();
    (!line.is_empty()).then(|| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::AiLlmError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Reply(&'static str);

    #[async_trait]
    impl TextGenerator for Reply {
        async fn generate(&self, _p: &str, _s: Option<&str>) -> ai_llm_service::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _p: &str, _s: Option<&str>) -> ai_llm_service::Result<String> {
            Err(AiLlmError::Timeout(Duration::from_secs(8)))
        }
    }

    #[tokio::test]
    async fn uses_model_reply() {
        let n = QueryNormalizer::new(Arc::new(Reply("\"Mumbai Indians IPL titles\"\n")));
        assert_eq!(n.normalize("MI titls").await, "Mumbai Indians IPL titles");
    }

    #[tokio::test]
    async fn fails_soft_to_trimmed_input() {
        let n = QueryNormalizer::new(Arc::new(Failing));
        assert_eq!(n.normalize("  csk  2010 ").await, "csk  2010");
    }

    #[tokio::test]
    async fn blank_reply_falls_back() {
        let n = QueryNormalizer::new(Arc::new(Reply("   \n  ")));
        assert_eq!(n.normalize("ipl").await, "ipl");
    }

    #[test]
    fn strips_label_prefix() {
        assert_eq!(
            clean_reply("Rewritten query: Chennai Super Kings").as_deref(),
            Some("Chennai Super Kings")
        );
    }
}
