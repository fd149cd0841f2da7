//! Qdrant vector DB helpers: connection, collection lifecycle, batched upserts,
//! id lookups, per-type counts and top-K search.
//!
//! This module does **not** read records or create embeddings, only DB I/O.

use std::collections::HashSet;

use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, Distance, Filter, GetPointsBuilder,
    PointId, PointStruct, ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder, point_id::PointIdOptions,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{DistanceMetric, IndexConfig};
use crate::errors::IndexError;
use crate::record::SearchResult;

/// Establish a gRPC client for `cfg.qdrant.url`. Does not touch collections.
pub fn connect(cfg: &IndexConfig) -> Result<Qdrant, IndexError> {
    let mut builder = Qdrant::from_url(&cfg.qdrant.url);
    if let Some(key) = &cfg.qdrant.api_key {
        builder = builder.api_key(key.clone());
    }
    builder
        .build()
        .map_err(|e| IndexError::Qdrant(format!("client build: {e}")))
}

/// Deterministic point id for a record id; re-ingesting overwrites instead of duplicating.
pub fn point_uuid(record_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, record_id.as_bytes()).to_string()
}

pub async fn collection_exists(client: &Qdrant, cfg: &IndexConfig) -> Result<bool, IndexError> {
    client
        .collection_exists(&cfg.qdrant.collection)
        .await
        .map_err(|e| IndexError::Qdrant(format!("collection_exists: {e}")))
}

/// Fails with [`IndexError::NoIndex`] when the collection is missing.
pub async fn require_collection(client: &Qdrant, cfg: &IndexConfig) -> Result<(), IndexError> {
    if collection_exists(client, cfg).await? {
        Ok(())
    } else {
        Err(IndexError::NoIndex {
            collection: cfg.qdrant.collection.clone(),
        })
    }
}

fn distance(metric: DistanceMetric) -> Distance {
    match metric {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::Dot => Distance::Dot,
        DistanceMetric::Euclid => Distance::Euclid,
    }
}

/// Create the collection with the configured dim/metric.
pub async fn create_collection(client: &Qdrant, cfg: &IndexConfig) -> Result<(), IndexError> {
    client
        .create_collection(
            CreateCollectionBuilder::new(&cfg.qdrant.collection).vectors_config(
                VectorParamsBuilder::new(cfg.embedding_dim as u64, distance(cfg.qdrant.distance)),
            ),
        )
        .await
        .map_err(|e| IndexError::Qdrant(format!("create_collection: {e}")))?;
    Ok(())
}

/// Drop the collection (if present) and create it again.
pub async fn reset_collection(client: &Qdrant, cfg: &IndexConfig) -> Result<(), IndexError> {
    if collection_exists(client, cfg).await? {
        client
            .delete_collection(&cfg.qdrant.collection)
            .await
            .map_err(|e| IndexError::Qdrant(format!("delete_collection: {e}")))?;
    }
    create_collection(client, cfg).await
}

/// Create the collection only if it is missing. Returns `true` if it was created.
pub async fn ensure_collection(client: &Qdrant, cfg: &IndexConfig) -> Result<bool, IndexError> {
    if collection_exists(client, cfg).await? {
        return Ok(false);
    }
    create_collection(client, cfg).await?;
    Ok(true)
}

fn record_to_payload(record: &SearchResult) -> Result<Payload, IndexError> {
    let as_json = serde_json::to_value(record)?;
    Payload::try_from(as_json).map_err(|e| IndexError::Qdrant(format!("payload convert: {e}")))
}

/// Upsert `(record, vector)` pairs. Vector length must equal `cfg.embedding_dim`.
///
/// Returns the number of upserted points.
pub async fn upsert_batch(
    client: &Qdrant,
    cfg: &IndexConfig,
    batch: Vec<(SearchResult, Vec<f32>)>,
) -> Result<usize, IndexError> {
    if batch.is_empty() {
        return Ok(0);
    }

    let mut points: Vec<PointStruct> = Vec::with_capacity(batch.len());
    for (record, vector) in batch {
        if vector.len() != cfg.embedding_dim {
            return Err(IndexError::InvalidConfig(format!(
                "vector length {} != EMBEDDING_DIM {} for id {}",
                vector.len(),
                cfg.embedding_dim,
                record.id
            )));
        }
        let payload = record_to_payload(&record)?;
        points.push(PointStruct::new(point_uuid(&record.id), vector, payload));
    }

    let written = points.len();
    client
        .upsert_points(UpsertPointsBuilder::new(&cfg.qdrant.collection, points).wait(true))
        .await
        .map_err(|e| IndexError::Qdrant(format!("upsert_points: {e}")))?;

    debug!(written, "upsert_batch done");
    Ok(written)
}

/// Returns which of `record_ids` already have a point in the collection.
pub async fn existing_ids(
    client: &Qdrant,
    cfg: &IndexConfig,
    record_ids: &[String],
) -> Result<HashSet<String>, IndexError> {
    if record_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<PointId> = record_ids
        .iter()
        .map(|id| PointId::from(point_uuid(id)))
        .collect();

    let resp = client
        .get_points(
            GetPointsBuilder::new(&cfg.qdrant.collection, ids)
                .with_payload(false)
                .with_vectors(false),
        )
        .await
        .map_err(|e| IndexError::Qdrant(format!("get_points: {e}")))?;

    let found: HashSet<String> = resp
        .result
        .into_iter()
        .filter_map(|p| point_id_string(p.id))
        .collect();

    Ok(record_ids
        .iter()
        .filter(|id| found.contains(&point_uuid(id)))
        .cloned()
        .collect())
}

/// Exact point count, optionally restricted to one `type`.
pub async fn count_points(
    client: &Qdrant,
    cfg: &IndexConfig,
    kind: Option<&str>,
) -> Result<u64, IndexError> {
    let mut builder = CountPointsBuilder::new(&cfg.qdrant.collection).exact(true);
    if let Some(kind) = kind {
        builder = builder.filter(Filter::must([Condition::matches("type", kind.to_string())]));
    }
    let resp = client
        .count(builder)
        .await
        .map_err(|e| IndexError::Qdrant(format!("count: {e}")))?;
    Ok(resp.result.map(|r| r.count).unwrap_or(0))
}

/// k-NN search for a query vector; payloads are decoded back into [`SearchResult`].
///
/// Points whose payload cannot be decoded are skipped with a warning.
pub async fn search_top_k(
    client: &Qdrant,
    cfg: &IndexConfig,
    query_vec: Vec<f32>,
    k: usize,
) -> Result<Vec<SearchResult>, IndexError> {
    if query_vec.len() != cfg.embedding_dim {
        return Err(IndexError::InvalidConfig(format!(
            "query vector length {} != EMBEDDING_DIM {}",
            query_vec.len(),
            cfg.embedding_dim
        )));
    }

    let mut builder =
        SearchPointsBuilder::new(&cfg.qdrant.collection, query_vec, k as u64).with_payload(true);
    if let Some(t) = cfg.retrieval.min_score {
        builder = builder.score_threshold(t);
    }

    let resp = client
        .search_points(builder)
        .await
        .map_err(|e| IndexError::Qdrant(format!("search_points: {e}")))?;

    Ok(resp
        .result
        .into_iter()
        .filter_map(|sp| match scored_point_to_record(sp) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(error = %e, "skipping hit with undecodable payload");
                None
            }
        })
        .collect())
}

fn scored_point_to_record(sp: ScoredPoint) -> Result<SearchResult, IndexError> {
    let obj: serde_json::Map<String, Value> = sp
        .payload
        .into_iter()
        .map(|(k, v)| (k, v.into_json()))
        .collect();
    Ok(serde_json::from_value(Value::Object(obj))?)
}

fn point_id_string(pid: Option<PointId>) -> Option<String> {
    match pid?.point_id_options? {
        PointIdOptions::Uuid(s) => Some(s),
        PointIdOptions::Num(n) => Some(n.to_string()),
    }
}
