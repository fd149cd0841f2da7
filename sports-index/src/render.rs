//! Text renderer: one template per record kind.
//!
//! Each renderer composes the searchable `emb_text` sentence and promotes the
//! shared facets (`teams`, `players`, `sport`, `league`, `season`, `date`).
//! Missing fields render as empty segments; rendering never fails.

use serde_json::Value;

use crate::record::{RecordKind, SearchResult, UNKNOWN};

/// League named in commentary text when the record carries none.
const DEFAULT_LEAGUE: &str = "IPL";

/// Maximum number of characters kept from a team bio.
pub const BIO_PREFIX_CHARS: usize = 200;

/// Renders a record whose `type` field names its kind.
///
/// Returns `None` when the type is absent or outside the closed set; such
/// records are skipped by ingestion, never rendered.
pub fn render_value(record: &Value) -> Option<SearchResult> {
    let kind = record.get("type")?.as_str()?.parse::<RecordKind>().ok()?;
    Some(render_record(kind, record))
}

/// Renders `record` as `kind`, stamping the kind onto the retained raw record.
pub fn render_record(kind: RecordKind, record: &Value) -> SearchResult {
    let mut raw = record.clone();
    if let Value::Object(map) = &mut raw {
        map.insert("type".into(), Value::String(kind.as_str().into()));
    }

    let (text, facets) = match kind {
        RecordKind::Commentary => render_commentary(&raw),
        RecordKind::MatchInfo => render_match_info(&raw),
        RecordKind::PlayerBio => render_player_bio(&raw),
        RecordKind::PlayerStats => render_player_stats(&raw),
        RecordKind::TeamStats => render_team_stats(&raw),
        RecordKind::TeamProfile => render_team_profile(&raw),
    };

    with_common(kind, raw, text, facets)
}

/// Facets a renderer promotes on top of the common ones.
#[derive(Default)]
struct Facets {
    teams: Vec<String>,
    players: Vec<String>,
    id: Option<String>,
    league: Option<&'static str>,
}

fn render_commentary(r: &Value) -> (String, Facets) {
    let runs = match r.get("runs_off_bat").and_then(Value::as_i64) {
        Some(off_bat) => {
            (off_bat + r.get("extras").and_then(Value::as_i64).unwrap_or(0)).to_string()
        }
        None => String::new(),
    };
    let league = Some(field(r, "league"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LEAGUE.to_string());
    let text = format!(
        "{} {}, {} vs {}, Innings {}, Over {}.{}: {} to {} \u{2014} {} run(s). Note: {}",
        league,
        field(r, "season"),
        field(r, "batting_team"),
        field(r, "bowling_team"),
        field(r, "innings"),
        field(r, "over"),
        field(r, "ball"),
        field(r, "bowler"),
        field(r, "batter"),
        runs,
        field(r, "text"),
    );
    let facets = Facets {
        teams: non_empty([field(r, "batting_team"), field(r, "bowling_team")]),
        players: non_empty([field(r, "batter"), field(r, "bowler")]),
        ..Facets::default()
    };
    (text, facets)
}

fn render_match_info(r: &Value) -> (String, Facets) {
    let teams = string_list(r, "teams");
    let result = match r.get("result") {
        Some(res) if !res.is_null() => format!(
            " Result: {} won by {}.",
            field(res, "winner"),
            field(res, "margin")
        ),
        _ => String::new(),
    };
    let text = format!(
        "{} {}: {} at {} on {}. Toss: {} chose {}.{}",
        field(r, "league"),
        field(r, "season"),
        teams.join(" vs "),
        field(r, "venue"),
        field(r, "date"),
        field(r, "toss_winner"),
        field(r, "toss_decision"),
        result,
    );
    (
        text,
        Facets {
            teams,
            ..Facets::default()
        },
    )
}

fn render_player_bio(r: &Value) -> (String, Facets) {
    let teams = string_list(r, "teams");
    let player = player_name(r);
    let text = format!(
        "{} (born {}) is a {}. Batting: {}. Bowling: {}. Teams: {}. Highlights: {}",
        player,
        field(r, "dob"),
        field(r, "role"),
        field(r, "batting_style"),
        field(r, "bowling_style"),
        teams.join(", "),
        string_list(r, "highlights").join(" | "),
    );
    (
        text,
        Facets {
            teams,
            players: non_empty([player]),
            ..Facets::default()
        },
    )
}

fn render_player_stats(r: &Value) -> (String, Facets) {
    let career = r.get("career").unwrap_or(&Value::Null);
    let season_line = match r
        .get("by_season")
        .and_then(Value::as_array)
        .and_then(|s| s.first())
    {
        Some(s) => format!(
            " In {}: {} runs (SR {}), HS {}.",
            field(s, "season"),
            field(s, "runs"),
            field(s, "sr"),
            field(s, "hs")
        ),
        None => String::new(),
    };
    let player = player_name(r);
    let text = format!(
        "{} in {}: career {} runs (SR {}), {} matches, avg {}.{}",
        player,
        field(r, "league"),
        field(career, "runs"),
        field(career, "strike_rate"),
        field(career, "matches"),
        field(career, "avg"),
        season_line,
    );
    (
        text,
        Facets {
            players: non_empty([player]),
            ..Facets::default()
        },
    )
}

fn render_team_stats(r: &Value) -> (String, Facets) {
    let summary = r.get("summary").unwrap_or(&Value::Null);
    let highest = r.get("highest_total").unwrap_or(&Value::Null);
    let text = format!(
        "{} in {} {}: {} wins, {} losses, NRR {}. Highest total {} vs {} on {}.",
        field(r, "team"),
        field(r, "league"),
        field(r, "season"),
        field(summary, "wins"),
        field(summary, "losses"),
        field(summary, "nrr"),
        field(highest, "runs"),
        field(highest, "opponent"),
        field(highest, "date"),
    );
    (
        text,
        Facets {
            teams: non_empty([field(r, "team")]),
            ..Facets::default()
        },
    )
}

fn render_team_profile(r: &Value) -> (String, Facets) {
    let home_ground = match r.get("home_ground") {
        Some(g) if g.is_object() => format!(
            "{} in {}",
            field(g, "name"),
            first_non_empty(g, &["city", "location"])
        ),
        _ => "Unknown venue".to_string(),
    };

    let titles = r
        .get("titles")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(title_text).collect::<Vec<_>>().join(", "))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "No titles".to_string());

    let team_name = field(r, "team_name");
    let team_id = field(r, "team_id");

    let mut text = format!(
        "{} (ID: {}) owned by {}. Home ground: {}. Titles: {}.",
        team_name,
        team_id,
        field(r, "owner"),
        home_ground,
        titles,
    );
    let bio = field(r, "bio");
    if !bio.is_empty() {
        text.push_str(" Background: ");
        text.push_str(&truncate_chars(&bio, BIO_PREFIX_CHARS));
        text.push_str("...");
    }

    (
        text,
        Facets {
            teams: non_empty([team_name]),
            id: Some(team_id).filter(|s| !s.is_empty()),
            league: Some(DEFAULT_LEAGUE),
            ..Facets::default()
        },
    )
}

/// `"{name} ({count} time(s): years)"`, or the plain string for string titles.
pub(crate) fn title_text(t: &Value) -> String {
    match t {
        Value::String(s) => s.clone(),
        Value::Object(_) => {
            let name = first_non_empty(t, &["name", "tournament"]);
            let count = field(t, "count");
            let unit = if count == "1" { "time" } else { "times" };
            let years = string_list(t, "years").join(", ");
            format!("{name} ({count} {unit}: {years})")
        }
        other => scalar_text(other),
    }
}

fn with_common(kind: RecordKind, raw: Value, text: String, facets: Facets) -> SearchResult {
    let or_unknown = |key: &str, extra: Option<&'static str>| {
        Some(field(&raw, key))
            .filter(|s| !s.is_empty())
            .or_else(|| extra.map(str::to_string))
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    let id = Some(field(&raw, "id"))
        .filter(|s| !s.is_empty())
        .or(facets.id)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let sport = Some(field(&raw, "sport"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "cricket".to_string());
    let league = or_unknown("league", facets.league);
    let season = or_unknown("season", None);

    SearchResult {
        id,
        kind: kind.as_str().to_string(),
        embedded_text: text.trim().to_string(),
        sport,
        league,
        season,
        match_id: opt_field(&raw, "match_id"),
        teams: facets.teams,
        players: facets.players,
        date: opt_field(&raw, "date")
            .or_else(|| opt_field(&raw, "timestamp"))
            .or_else(|| opt_field(&raw, "as_of")),
        source_url: opt_field(&raw, "source_url"),
        raw,
    }
}

/* ------------------------------------------------------------------------- */
/* Field helpers                                                             */
/* ------------------------------------------------------------------------- */

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Scalar field as display text; missing, null and nested values render empty.
pub(crate) fn field(v: &Value, key: &str) -> String {
    v.get(key).map(scalar_text).unwrap_or_default()
}

fn opt_field(v: &Value, key: &str) -> Option<String> {
    Some(field(v, key)).filter(|s| !s.is_empty())
}

fn first_non_empty(v: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| field(v, k))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// `player` or, for records scraped with the long name, `player_name`.
pub(crate) fn player_name(v: &Value) -> String {
    first_non_empty(v, &["player", "player_name"])
}

pub(crate) fn string_list(v: &Value, key: &str) -> Vec<String> {
    v.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(scalar_text)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty<const N: usize>(items: [String; N]) -> Vec<String> {
    items.into_iter().filter(|s| !s.is_empty()).collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
