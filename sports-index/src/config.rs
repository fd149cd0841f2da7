//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for embeddings, Qdrant, retrieval and ingestion.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::IndexError;

/// Distance metric supported by Qdrant for the primary vector space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DistanceMetric {
    Cosine,
    Dot,
    Euclid,
}

impl DistanceMetric {
    /// Parse from env string (case-insensitive). Defaults to Cosine.
    pub fn from_env(s: Option<String>) -> Self {
        match s
            .unwrap_or_else(|| "Cosine".to_string())
            .to_lowercase()
            .as_str()
        {
            "dot" | "dotproduct" => DistanceMetric::Dot,
            "euclid" | "l2" => DistanceMetric::Euclid,
            _ => DistanceMetric::Cosine,
        }
    }
}

/// Qdrant connectivity and collection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// gRPC URL for Qdrant (e.g., "http://localhost:6334").
    pub url: String,
    /// Optional API key for managed deployments.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub collection: String,
    pub distance: DistanceMetric,
    /// Batch size for embed + upsert rounds.
    pub batch_size: usize,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "sports_chunks".to_string(),
            distance: DistanceMetric::Cosine,
            batch_size: 64,
        }
    }
}

/// Retrieval knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Master switch for normalization + retrieval.
    pub enabled: bool,
    /// Number of hits requested per query.
    pub top_k: usize,
    /// Optional minimum score threshold passed to Qdrant.
    pub min_score: Option<f32>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_k: 5,
            min_score: None,
        }
    }
}

/// Top-level runtime configuration for the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Root of the per-type record directories.
    pub chunks_dir: PathBuf,
    /// Embedding vector dimensionality (1536 for text-embedding-3-small).
    pub embedding_dim: usize,
    pub qdrant: QdrantConfig,
    pub retrieval: RetrievalConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunks_dir: PathBuf::from("data/chunks"),
            embedding_dim: 1536,
            qdrant: QdrantConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `CHUNKS_DIR` (default: "data/chunks")
    /// - `EMBEDDING_DIM` (default: 1536)
    /// - `QDRANT_URL` (default: "http://localhost:6334")
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default: "sports_chunks")
    /// - `QDRANT_DISTANCE` ("Cosine" | "Dot" | "Euclid"; default: "Cosine")
    /// - `QDRANT_BATCH_SIZE` (default: 64)
    /// - `RAG_ENABLED` (default: true)
    /// - `RAG_TOP_K` (default: 5)
    /// - `RAG_MIN_SCORE` (optional)
    pub fn from_env() -> Result<Self, IndexError> {
        let defaults = IndexConfig::default();

        let qdrant = QdrantConfig {
            url: env_string("QDRANT_URL").unwrap_or(defaults.qdrant.url),
            api_key: env_string("QDRANT_API_KEY"),
            collection: env_string("QDRANT_COLLECTION").unwrap_or(defaults.qdrant.collection),
            distance: DistanceMetric::from_env(env_string("QDRANT_DISTANCE")),
            batch_size: read_usize_env("QDRANT_BATCH_SIZE")?.unwrap_or(defaults.qdrant.batch_size),
        };

        let retrieval = RetrievalConfig {
            enabled: read_bool_env("RAG_ENABLED")?.unwrap_or(defaults.retrieval.enabled),
            top_k: read_usize_env("RAG_TOP_K")?.unwrap_or(defaults.retrieval.top_k),
            min_score: read_f32_env("RAG_MIN_SCORE")?,
        };

        let cfg = Self {
            chunks_dir: env_string("CHUNKS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.chunks_dir),
            embedding_dim: read_usize_env("EMBEDDING_DIM")?.unwrap_or(defaults.embedding_dim),
            qdrant,
            retrieval,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Basic sanity checks shared by `from_env` and hand-built configs.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.embedding_dim == 0 {
            return Err(IndexError::InvalidConfig("EMBEDDING_DIM must be > 0".into()));
        }
        if self.retrieval.top_k == 0 {
            return Err(IndexError::InvalidConfig("RAG_TOP_K must be > 0".into()));
        }
        if self.qdrant.batch_size == 0 {
            return Err(IndexError::InvalidConfig("QDRANT_BATCH_SIZE must be > 0".into()));
        }
        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read an optional `usize` from env; unset is `Ok(None)`.
fn read_usize_env(key: &str) -> Result<Option<usize>, IndexError> {
    env_string(key)
        .map(|v| {
            v.trim().parse::<usize>().map_err(|_| IndexError::EnvParse {
                key: key.into(),
                value: v,
            })
        })
        .transpose()
}

/// Read an optional `bool` from env. Accepts `true/false/1/0/yes/no`.
fn read_bool_env(key: &str) -> Result<Option<bool>, IndexError> {
    env_string(key)
        .map(|v| parse_bool(&v).ok_or(IndexError::EnvParse { key: key.into(), value: v }))
        .transpose()
}

/// Read an optional `f32` from env.
fn read_f32_env(key: &str) -> Result<Option<f32>, IndexError> {
    env_string(key)
        .map(|v| {
            v.trim().parse::<f32>().map_err(|_| IndexError::EnvParse {
                key: key.into(),
                value: v,
            })
        })
        .transpose()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_parsing_is_lenient() {
        assert_eq!(DistanceMetric::from_env(Some("DOT".into())), DistanceMetric::Dot);
        assert_eq!(DistanceMetric::from_env(Some("l2".into())), DistanceMetric::Euclid);
        assert_eq!(DistanceMetric::from_env(Some("weird".into())), DistanceMetric::Cosine);
        assert_eq!(DistanceMetric::from_env(None), DistanceMetric::Cosine);
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = IndexConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.qdrant.collection, "sports_chunks");
        assert_eq!(cfg.retrieval.top_k, 5);
    }

    #[test]
    fn zero_dim_is_rejected() {
        let cfg = IndexConfig {
            embedding_dim: 0,
            ..IndexConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(IndexError::InvalidConfig(_))));
    }
}
