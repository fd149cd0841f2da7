use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TriviaError;

/// Questions per generated set.
pub const QUESTION_COUNT: usize = 5;
/// Options per question.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Exactly one entry, which is also present in `options`.
    pub answer: Vec<String>,
}

impl TriviaQuestion {
    pub fn new(question: &str, options: [&str; OPTION_COUNT], answer: &str) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: vec![answer.to_string()],
        }
    }

    /// Structural check: non-empty question, 4 distinct options, 1 answer drawn from the options.
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("empty question".into());
        }
        if self.options.len() != OPTION_COUNT {
            return Err(format!(
                "expected {OPTION_COUNT} options, got {}",
                self.options.len()
            ));
        }
        let distinct: HashSet<&str> = self.options.iter().map(String::as_str).collect();
        if distinct.len() != OPTION_COUNT {
            return Err("options are not distinct".into());
        }
        match self.answer.as_slice() {
            [only] if self.options.contains(only) => Ok(()),
            [only] => Err(format!("answer '{only}' is not one of the options")),
            other => Err(format!("expected 1 answer, got {}", other.len())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaResponse {
    pub data: Vec<TriviaQuestion>,
}

impl TriviaResponse {
    /// Full-set check used right before a response leaves the engine.
    pub fn ensure_valid(&self) -> Result<(), TriviaError> {
        if self.data.len() != QUESTION_COUNT {
            return Err(TriviaError::Invariant(format!(
                "expected {QUESTION_COUNT} questions, got {}",
                self.data.len()
            )));
        }
        for (i, q) in self.data.iter().enumerate() {
            q.validate()
                .map_err(|e| TriviaError::Invariant(format!("question {}: {e}", i + 1)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q() -> TriviaQuestion {
        TriviaQuestion::new("Who won?", ["A", "B", "C", "D"], "B")
    }

    #[test]
    fn well_formed_question_passes() {
        assert!(q().validate().is_ok());
    }

    #[test]
    fn answer_outside_options_fails() {
        let mut bad = q();
        bad.answer = vec!["E".into()];
        assert!(bad.validate().unwrap_err().contains("not one of the options"));
    }

    #[test]
    fn duplicate_options_fail() {
        let mut bad = q();
        bad.options[3] = "A".into();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn short_set_is_invariant_error() {
        let resp = TriviaResponse { data: vec![q(); 4] };
        assert!(matches!(resp.ensure_valid(), Err(TriviaError::Invariant(_))));
        let resp = TriviaResponse { data: vec![q(); 5] };
        assert!(resp.ensure_valid().is_ok());
    }
}
