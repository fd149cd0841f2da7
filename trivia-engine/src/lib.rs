//! Sports trivia generation: context formatting, query normalization,
//! LLM generation with repair and fallback, and the per-request orchestrator.

pub mod context;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod normalizer;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod types;

pub use context::{CONTEXT_SEPARATOR, build_context, format_result};
pub use error::TriviaError;
pub use fallback::{fallback_trivia, sample_trivia};
pub use generator::TriviaGenerator;
pub use normalizer::QueryNormalizer;
pub use pipeline::{PipelineConfig, Route, TriviaOutcome, TriviaPipeline};
pub use types::{OPTION_COUNT, QUESTION_COUNT, TriviaQuestion, TriviaResponse};
