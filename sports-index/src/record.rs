use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of record types known to the renderer and the context formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    TeamProfile,
    Commentary,
    MatchInfo,
    PlayerBio,
    PlayerStats,
    TeamStats,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::TeamProfile,
        RecordKind::Commentary,
        RecordKind::MatchInfo,
        RecordKind::PlayerBio,
        RecordKind::PlayerStats,
        RecordKind::TeamStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::TeamProfile => "team_profile",
            RecordKind::Commentary => "commentary",
            RecordKind::MatchInfo => "match_info",
            RecordKind::PlayerBio => "player_bio",
            RecordKind::PlayerStats => "player_stats",
            RecordKind::TeamStats => "team_stats",
        }
    }

    /// Sub-directory of the chunks root holding records of this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            RecordKind::PlayerBio => "player_bios",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned for type tags outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for RecordKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Sentinel for "not applicable" facets.
pub const UNKNOWN: &str = "unknown";

/// A retrieved (or ingestible) knowledge record.
///
/// `kind` is kept as a free string so that records with unrecognized types
/// survive a round trip through the index and reach the generic formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    /// Canonical text used for similarity search.
    #[serde(rename = "emb_text", alias = "embeddedText")]
    pub embedded_text: String,

    #[serde(default = "unknown")]
    pub sport: String,
    #[serde(default = "unknown")]
    pub league: String,
    #[serde(default = "unknown")]
    pub season: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,

    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub players: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, alias = "sourceUrl", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Original untyped record.
    #[serde(default)]
    pub raw: Value,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl SearchResult {
    /// Parsed record kind, or `None` for types outside the closed set.
    pub fn record_kind(&self) -> Option<RecordKind> {
        self.kind.parse().ok()
    }
}

/// `true` when a facet carries information (non-empty and not the sentinel).
pub fn is_populated(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && v != UNKNOWN
}
