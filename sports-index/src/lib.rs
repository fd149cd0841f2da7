//! Public API:
//! - [`SportsIndex::ingest`]: render records from disk, embed them, upsert into Qdrant.
//! - [`SportsIndex::stats`]: point count, total and per record type.
//! - [`SearchProvider::search`]: embed a query and return the top-K records.
//!   A missing collection is [`IndexError::NoIndex`], not an empty list.

pub mod config;
pub mod errors;
pub mod ingest;
pub mod record;
pub mod render;
mod vector_db;

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
    sync::Arc,
    time::Instant,
};

use ai_llm_service::Embedder;
use async_trait::async_trait;
use qdrant_client::Qdrant;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use config::IndexConfig;
pub use errors::IndexError;
pub use ingest::{IngestMode, IngestReport};
pub use record::{RecordKind, SearchResult};

use ingest::load_rendered_records;
use vector_db::{
    connect, count_points, ensure_collection, existing_ids, require_collection, reset_collection,
    search_top_k, upsert_batch,
};

/// Similarity search over indexed records.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns up to `limit` records, best match first.
    ///
    /// # Errors
    /// [`IndexError::NoIndex`] when nothing was ever ingested; any other
    /// variant for transport or embedding failures.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, IndexError>;
}

/// Snapshot of the collection contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub record_count: u64,
    pub records_by_type: BTreeMap<String, u64>,
}

/// Qdrant-backed record index.
pub struct SportsIndex {
    client: Qdrant,
    cfg: IndexConfig,
    embedder: Arc<dyn Embedder>,
}

impl SportsIndex {
    /// Builds the client; no network round trip happens here.
    pub fn new(cfg: IndexConfig, embedder: Arc<dyn Embedder>) -> Result<Self, IndexError> {
        cfg.validate()?;
        let client = connect(&cfg)?;
        Ok(Self {
            client,
            cfg,
            embedder,
        })
    }

    pub fn from_env(embedder: Arc<dyn Embedder>) -> Result<Self, IndexError> {
        Self::new(IndexConfig::from_env()?, embedder)
    }

    pub fn config(&self) -> &IndexConfig {
        &self.cfg
    }

    /// Renders every record under `chunks_dir` and writes it to the collection.
    ///
    /// # Errors
    /// [`IndexError::EmptyIngest`] if no renderable record was found.
    pub async fn ingest(
        &self,
        chunks_dir: &Path,
        mode: IngestMode,
    ) -> Result<IngestReport, IndexError> {
        let started = Instant::now();
        info!(dir = %chunks_dir.display(), ?mode, "ingest: start");

        let records = dedup_by_id(load_rendered_records(chunks_dir).await?);
        if records.is_empty() {
            return Err(IndexError::EmptyIngest {
                dir: chunks_dir.display().to_string(),
            });
        }
        let total_processed = records.len();

        let (existing_records, to_write) = match mode {
            IngestMode::Fresh => {
                reset_collection(&self.client, &self.cfg).await?;
                (0, records)
            }
            IngestMode::Append => {
                if ensure_collection(&self.client, &self.cfg).await? {
                    (0, records)
                } else {
                    let existing = count_points(&self.client, &self.cfg, None).await? as usize;
                    let seen = self.already_indexed(&records).await?;
                    let fresh = records
                        .into_iter()
                        .filter(|r| !seen.contains(&r.id))
                        .collect::<Vec<_>>();
                    (existing, fresh)
                }
            }
        };

        let mut new_records = 0usize;
        for chunk in to_write.chunks(self.cfg.qdrant.batch_size) {
            let mut batch = Vec::with_capacity(chunk.len());
            for record in chunk {
                let vector = self.embedder.embed(&record.embedded_text).await?;
                batch.push((record.clone(), vector));
            }
            new_records += upsert_batch(&self.client, &self.cfg, batch).await?;
            debug!(written = new_records, "ingest: batch upserted");
        }

        let report = IngestReport {
            total_processed,
            new_records,
            existing_records,
        };
        info!(
            total = report.total_processed,
            new = report.new_records,
            existing = report.existing_records,
            duration_ms = started.elapsed().as_millis(),
            "ingest: finished"
        );
        Ok(report)
    }

    /// Counts points, in total and per known record type.
    pub async fn stats(&self) -> Result<IndexStats, IndexError> {
        require_collection(&self.client, &self.cfg).await?;

        let record_count = count_points(&self.client, &self.cfg, None).await?;
        let mut records_by_type = BTreeMap::new();
        for kind in RecordKind::ALL {
            let n = count_points(&self.client, &self.cfg, Some(kind.as_str())).await?;
            if n > 0 {
                records_by_type.insert(kind.as_str().to_string(), n);
            }
        }

        Ok(IndexStats {
            record_count,
            records_by_type,
        })
    }

    async fn already_indexed(&self, records: &[SearchResult]) -> Result<HashSet<String>, IndexError> {
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let mut seen = HashSet::new();
        for chunk in ids.chunks(self.cfg.qdrant.batch_size) {
            seen.extend(existing_ids(&self.client, &self.cfg, chunk).await?);
        }
        Ok(seen)
    }
}

#[async_trait]
impl SearchProvider for SportsIndex {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, IndexError> {
        let started = Instant::now();
        require_collection(&self.client, &self.cfg).await?;

        let query_vec = self.embedder.embed(query).await?;
        let hits = search_top_k(&self.client, &self.cfg, query_vec, limit).await?;

        info!(
            query = %query,
            hits = hits.len(),
            latency_ms = started.elapsed().as_millis(),
            "search: done"
        );
        Ok(hits)
    }
}

/// Keeps the first record per id; later duplicates would overwrite the same point.
fn dedup_by_id(records: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let before = records.len();
    let out: Vec<SearchResult> = records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    if out.len() != before {
        warn!(dropped = before - out.len(), "ingest: duplicate record ids dropped");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(id: &str) -> SearchResult {
        render::render_record(RecordKind::TeamStats, &json!({ "id": id, "team": "RCB" }))
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let out = dedup_by_id(vec![rec("a"), rec("b"), rec("a")]);
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = IndexStats {
            record_count: 3,
            records_by_type: BTreeMap::from([("commentary".to_string(), 3)]),
        };
        let v = serde_json::to_value(&stats).unwrap();
        assert_eq!(v["recordCount"], 3);
        assert_eq!(v["recordsByType"]["commentary"], 3);
    }
}
