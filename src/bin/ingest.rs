//! Loads rendered sports records into the vector index.
//!
//! ```bash
//! ingest --chunks-dir data/chunks --fresh
//! ingest --stats
//! ```

use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{Embedder, LlmServiceProfiles};
use anyhow::{Context, Result};
use clap::Parser;
use sports_index::{IngestMode, SportsIndex};
use sports_trivia_backend::telemetry;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ingest", about = "Index sports records for retrieval")]
struct Args {
    /// Root directory holding one sub-directory per record type.
    /// Defaults to `CHUNKS_DIR`.
    #[arg(long)]
    chunks_dir: Option<PathBuf>,

    /// Drop and recreate the collection before loading.
    #[arg(long)]
    fresh: bool,

    /// Print collection statistics and exit.
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init();
    let args = Args::parse();

    let profiles = Arc::new(LlmServiceProfiles::from_env().context("LLM configuration")?);
    let embedder: Arc<dyn Embedder> = profiles;
    let index = SportsIndex::from_env(embedder).context("index configuration")?;

    if args.stats {
        let stats = index.stats().await?;
        println!("{}", serde_json_pretty(&stats)?);
        return Ok(());
    }

    let dir = args
        .chunks_dir
        .unwrap_or_else(|| index.config().chunks_dir.clone());
    let mode = if args.fresh {
        IngestMode::Fresh
    } else {
        IngestMode::Append
    };

    info!(dir = %dir.display(), ?mode, "ingestion started");
    let report = index
        .ingest(&dir, mode)
        .await
        .with_context(|| format!("ingesting {}", dir.display()))?;
    println!("{}", serde_json_pretty(&report)?);
    Ok(())
}

fn serde_json_pretty<T: serde::Serialize>(v: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(v)?)
}
