//! Reads per-type record directories and renders them into ingestible rows.
//!
//! Layout under the chunks root (one JSON object per `*.json` file):
//!
//! ```text
//! chunks/
//!   team_profile/  commentary/  match_info/
//!   player_bios/   player_stats/  team_stats/
//! ```
//!
//! Missing directories are skipped. Every record is stamped with its
//! directory's kind before rendering; records with empty embedded text are dropped.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::IndexError;
use crate::record::{RecordKind, SearchResult};
use crate::render::render_record;

/// How ingestion treats an existing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Drop and recreate the collection.
    Fresh,
    /// Create if missing; only records with unseen ids are written.
    Append,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Renderable records found on disk.
    pub total_processed: usize,
    /// Records written in this run.
    pub new_records: usize,
    /// Points present in the collection before this run.
    pub existing_records: usize,
}

/// Loads and renders every record under `root`, in kind order then file-name order.
pub async fn load_rendered_records(root: &Path) -> Result<Vec<SearchResult>, IndexError> {
    let mut out = Vec::new();

    for kind in RecordKind::ALL {
        let dir = root.join(kind.dir_name());
        let records = read_json_dir(&dir).await?;
        let mut kept = 0usize;

        for record in records {
            let rendered = render_record(kind, &record);
            if rendered.embedded_text.is_empty() {
                continue;
            }
            kept += 1;
            out.push(rendered);
        }
        debug!(kind = %kind, dir = %dir.display(), kept, "rendered records");
    }

    Ok(out)
}

/// Reads all `*.json` files in `dir`. A missing dir yields an empty list;
/// unparsable files are skipped with a warning.
async fn read_json_dir(dir: &Path) -> Result<Vec<Value>, IndexError> {
    if !fs::try_exists(dir).await? {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut values = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path).await?;
        match serde_json::from_str::<Value>(&text) {
            Ok(v) => values.push(v),
            Err(e) => warn!(file = %path.display(), error = %e, "skipping unparsable record file"),
        }
    }
    Ok(values)
}
