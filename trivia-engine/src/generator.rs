//! Trivia generator: prompt, call the model, parse/repair, fall back.

use std::sync::{Arc, LazyLock};

use ai_llm_service::TextGenerator;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::TriviaError;
use crate::fallback::fallback_trivia;
use crate::parse::parse_trivia;
use crate::prompt::{TRIVIA_SYSTEM, build_enhanced_prompt, build_plain_prompt};
use crate::types::TriviaResponse;

static SPORTS_KEYWORDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(cricket|ipl|team|teams|player|players|match|captain|run|runs|wicket|wickets|over|overs|ball|balls|bowler|batter|batsman|innings|world cup|season|stadium|title|titles|trophy|franchise|league|final|score|scored|won|win|sport|sports|football|tennis|goal)\b",
    )
    .ok()
});

pub struct TriviaGenerator {
    llm: Arc<dyn TextGenerator>,
}

impl TriviaGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Plain generation. Any failure yields the fixed fallback set.
    pub async fn generate_plain(&self, topic: &str) -> TriviaResponse {
        match self.try_plain(topic).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(stage = "plain", error = %e, "generation failed; serving fallback set");
                fallback_trivia()
            }
        }
    }

    /// Enhanced generation. Any failure degrades to [`Self::generate_plain`]
    /// with the same topic.
    pub async fn generate_enhanced(&self, topic: &str, context: &str) -> TriviaResponse {
        match self.try_enhanced(topic, context).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(stage = "enhanced", error = %e, "generation failed; retrying as plain");
                self.generate_plain(topic).await
            }
        }
    }

    pub async fn try_plain(&self, topic: &str) -> Result<TriviaResponse, TriviaError> {
        self.attempt(&build_plain_prompt(topic)).await
    }

    pub async fn try_enhanced(
        &self,
        topic: &str,
        context: &str,
    ) -> Result<TriviaResponse, TriviaError> {
        self.attempt(&build_enhanced_prompt(topic, context)).await
    }

    async fn attempt(&self, prompt: &str) -> Result<TriviaResponse, TriviaError> {
        let raw = self.llm.generate(prompt, Some(TRIVIA_SYSTEM)).await?;
        debug!(raw_len = raw.len(), "generation reply received");
        let resp = parse_trivia(&raw)?;
        report_off_topic(&resp);
        info!(questions = resp.data.len(), "generation parsed");
        Ok(resp)
    }
}

/// Log-only: warns about questions without any sports keyword.
fn report_off_topic(resp: &TriviaResponse) {
    for (i, q) in resp.data.iter().enumerate() {
        if !mentions_sport(&q.question) {
            warn!(index = i + 1, question = %q.question, "question has no sports keyword");
        }
    }
}

pub(crate) fn mentions_sport(text: &str) -> bool {
    match SPORTS_KEYWORDS.as_ref() {
        Some(re) => re.is_match(text),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::sample_trivia;

    #[test]
    fn canned_sets_mention_sports() {
        for q in fallback_trivia().data.iter().chain(sample_trivia().data.iter()) {
            assert!(mentions_sport(&q.question), "{}", q.question);
        }
    }

    #[test]
    fn keyword_check_is_word_based() {
        assert!(mentions_sport("Who won the IPL in 2010?"));
        assert!(!mentions_sport("What is the capital of France?"));
    }
}
