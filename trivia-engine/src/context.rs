//! Context formatter: turns retrieved records into a factual prompt block.
//!
//! One strategy per record kind picks a fixed set of `"Label: value"` lines;
//! unknown kinds use the generic strategy. Afterwards any populated facet the
//! strategy did not print (embedded text, teams, players, league, season, sport,
//! date) is appended, followed by the match id and source URL, so no rendered
//! information is lost. Missing fields only
//! omit their line. The function is pure and order-preserving.

use serde_json::Value;
use sports_index::{RecordKind, SearchResult, record::is_populated};

/// Delimiter placed between per-record blocks.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Formats `results` into one context string, first result first.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(format_result)
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Formats a single record with the strategy matching its kind.
pub fn format_result(result: &SearchResult) -> String {
    let mut block = Block::new(result);
    match result.record_kind() {
        Some(RecordKind::TeamProfile) => team_profile(&mut block),
        Some(RecordKind::Commentary) => commentary(&mut block),
        Some(RecordKind::MatchInfo) => match_info(&mut block),
        Some(RecordKind::PlayerBio) => player_bio(&mut block),
        Some(RecordKind::PlayerStats) => player_stats(&mut block),
        Some(RecordKind::TeamStats) => team_stats(&mut block),
        None => generic(&mut block),
    }
    block.finish()
}

fn team_profile(b: &mut Block<'_>) {
    let raw = &b.result().raw;
    let team = raw_str(raw, "team_name");
    b.named_team("Team", &team);
    b.line("Owner", &raw_str(raw, "owner"));

    if let Some(ground) = raw.get("home_ground") {
        let name = raw_str(ground, "name");
        let place = first_raw_str(ground, &["location", "city"]);
        let value = match (name.is_empty(), place.is_empty()) {
            (false, false) => format!("{name}, {place}"),
            (false, true) => name,
            _ => String::new(),
        };
        b.line("Home Ground", &value);
    }

    if let Some(titles) = raw.get("titles").and_then(Value::as_array) {
        let joined = titles
            .iter()
            .map(title_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        b.line("Titles", &joined);
    }

    b.line("Background", &raw_str(raw, "bio"));
    b.league();
    b.sport();
}

fn commentary(b: &mut Block<'_>) {
    b.teams("Match", " vs ");
    b.date();
    let raw = &b.result().raw;
    let over = raw_str(raw, "over");
    let ball = raw_str(raw, "ball");
    if !over.is_empty() || !ball.is_empty() {
        b.line("Over/Ball", &format!("{over}.{ball}"));
    }
    b.text("Commentary");
    b.players("Players");
}

fn match_info(b: &mut Block<'_>) {
    b.teams("Teams", " vs ");
    b.date();
    let raw = &b.result().raw;
    let venue = raw_str(raw, "venue");
    let result = match raw.get("result") {
        Some(res @ Value::Object(_)) => {
            let winner = raw_str(res, "winner");
            let margin = raw_str(res, "margin");
            match (winner.is_empty(), margin.is_empty()) {
                (false, false) => format!("{winner} won by {margin}"),
                (false, true) => winner,
                _ => String::new(),
            }
        }
        Some(other) => scalar(other),
        None => String::new(),
    };
    let toss = {
        let direct = raw_str(raw, "toss");
        if direct.is_empty() {
            let winner = raw_str(raw, "toss_winner");
            let decision = raw_str(raw, "toss_decision");
            match (winner.is_empty(), decision.is_empty()) {
                (false, false) => format!("{winner} chose {decision}"),
                (false, true) => winner,
                _ => String::new(),
            }
        } else {
            direct
        }
    };
    b.line("Venue", &venue);
    b.line("Result", &result);
    b.line("Toss", &toss);
    b.text("Match Info");
}

fn player_bio(b: &mut Block<'_>) {
    let raw = &b.result().raw;
    let player = first_raw_str(raw, &["player_name", "player"]);
    let nationality = raw_str(raw, "nationality");
    let role = raw_str(raw, "role");
    let batting = raw_str(raw, "batting_style");
    let bowling = raw_str(raw, "bowling_style");

    b.named_player("Player", &player);
    b.line("Nationality", &nationality);
    b.line("Role", &role);
    b.line("Batting Style", &batting);
    b.line("Bowling Style", &bowling);
    b.teams("Teams", ", ");
    b.text("Biography");
}

fn player_stats(b: &mut Block<'_>) {
    let player = first_raw_str(&b.result().raw, &["player_name", "player"]);
    b.named_player("Player", &player);
    b.teams("Teams", " vs ");
    b.season();
    b.text("Stats");
}

fn team_stats(b: &mut Block<'_>) {
    b.teams("Team", ", ");
    b.season();
    b.league();
    b.text("Team Stats");
}

fn generic(b: &mut Block<'_>) {
    b.text("Content");
    b.teams("Teams", ", ");
    b.players("Players");
    b.sport();
}

/// Lines for one record plus which facets they already cover.
struct Block<'a> {
    result: &'a SearchResult,
    lines: Vec<String>,
    text: bool,
    teams: bool,
    players: bool,
    league: bool,
    season: bool,
    sport: bool,
    date: bool,
}

impl<'a> Block<'a> {
    fn new(result: &'a SearchResult) -> Self {
        Self {
            result,
            lines: Vec::new(),
            text: false,
            teams: false,
            players: false,
            league: false,
            season: false,
            sport: false,
            date: false,
        }
    }

    /// The record being formatted, detached from the borrow of `self`.
    fn result(&self) -> &'a SearchResult {
        self.result
    }

    /// Pushes `Label: value` unless `value` is blank.
    fn line(&mut self, label: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.lines.push(format!("{label}: {value}"));
        }
    }

    fn text(&mut self, label: &str) {
        let r = self.result;
        self.line(label, &r.embedded_text);
        self.text = true;
    }

    fn teams(&mut self, label: &str, sep: &str) {
        let r = self.result;
        if !r.teams.is_empty() {
            self.line(label, &r.teams.join(sep));
        }
        self.teams = true;
    }

    fn players(&mut self, label: &str) {
        let r = self.result;
        if !r.players.is_empty() {
            self.line(label, &r.players.join(", "));
        }
        self.players = true;
    }

    /// A single team name line; covers the teams facet when it lists only that team.
    fn named_team(&mut self, label: &str, name: &str) {
        self.line(label, name);
        if !name.is_empty() && self.result.teams.iter().all(|t| t == name) {
            self.teams = true;
        }
    }

    fn named_player(&mut self, label: &str, name: &str) {
        self.line(label, name);
        if !name.is_empty() && self.result.players.iter().all(|p| p == name) {
            self.players = true;
        }
    }

    fn league(&mut self) {
        let r = self.result;
        if is_populated(&r.league) {
            self.line("League", &r.league);
        }
        self.league = true;
    }

    fn season(&mut self) {
        let r = self.result;
        if is_populated(&r.season) {
            self.line("Season", &r.season);
        }
        self.season = true;
    }

    fn sport(&mut self) {
        let r = self.result;
        if is_populated(&r.sport) {
            self.line("Sport", &r.sport);
        }
        self.sport = true;
    }

    fn date(&mut self) {
        let r = self.result;
        if let Some(date) = &r.date {
            self.line("Date", date);
        }
        self.date = true;
    }

    /// Appends uncovered populated facets and joins the lines.
    fn finish(mut self) -> String {
        if !self.text {
            self.text("Content");
        }
        if !self.teams {
            self.teams("Teams", ", ");
        }
        if !self.players {
            self.players("Players");
        }
        if !self.league {
            self.league();
        }
        if !self.season {
            self.season();
        }
        if !self.sport {
            self.sport();
        }
        if !self.date {
            self.date();
        }
        let r = self.result;
        if let Some(match_id) = &r.match_id {
            self.line("Match ID", match_id);
        }
        if let Some(url) = &r.source_url {
            self.line("Source", url);
        }
        self.lines.join("\n")
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn raw_str(v: &Value, key: &str) -> String {
    v.get(key).map(scalar).unwrap_or_default()
}

fn first_raw_str(v: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| raw_str(v, k))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn title_text(t: &Value) -> String {
    match t {
        Value::Object(_) => {
            let name = first_raw_str(t, &["tournament", "name"]);
            let years = t
                .get("years")
                .and_then(Value::as_array)
                .map(|ys| ys.iter().map(scalar).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            let count = raw_str(t, "count");
            match (count.is_empty(), years.is_empty()) {
                (true, true) => name,
                (false, true) => format!("{name} ({count} times)"),
                (true, false) => format!("{name} ({years})"),
                (false, false) => format!("{name} ({count} times: {years})"),
            }
        }
        other => scalar(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(kind: &str, text: &str, raw: Value) -> SearchResult {
        SearchResult {
            id: "r1".into(),
            kind: kind.into(),
            embedded_text: text.into(),
            sport: "cricket".into(),
            league: "IPL".into(),
            season: "2023".into(),
            match_id: None,
            teams: vec!["CSK".into(), "GT".into()],
            players: vec![],
            date: Some("2023-05-29".into()),
            source_url: None,
            raw,
        }
    }

    #[test]
    fn match_info_lines_in_order() {
        let r = result(
            "match_info",
            "IPL 2023 final",
            json!({ "venue": "Ahmedabad", "result": { "winner": "CSK", "margin": "5 wickets" } }),
        );
        let text = format_result(&r);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Teams: CSK vs GT");
        assert_eq!(lines[1], "Date: 2023-05-29");
        assert_eq!(lines[2], "Venue: Ahmedabad");
        assert_eq!(lines[3], "Result: CSK won by 5 wickets");
        assert_eq!(lines[4], "Match Info: IPL 2023 final");
        // facets not printed by the strategy are appended
        assert!(text.contains("League: IPL"));
        assert!(text.contains("Season: 2023"));
        assert!(text.contains("Sport: cricket"));
    }

    #[test]
    fn unknown_kind_uses_generic_strategy() {
        let mut r = result("venue", "Wankhede Stadium, Mumbai", Value::Null);
        r.league = "unknown".into();
        let text = format_result(&r);
        assert!(text.starts_with("Content: Wankhede Stadium, Mumbai\nTeams: CSK, GT"));
        assert!(!text.contains("League:"));
    }

    #[test]
    fn missing_raw_fields_only_omit_lines() {
        let r = result("team_profile", "Mumbai Indians (ID: mi)", json!({}));
        let text = format_result(&r);
        assert!(!text.contains("Owner:"));
        assert!(!text.contains("Home Ground:"));
        assert!(text.contains("Content: Mumbai Indians (ID: mi)"));
    }

    #[test]
    fn blocks_are_joined_with_separator_in_order() {
        let a = result("commentary", "first", Value::Null);
        let b = result("commentary", "second", Value::Null);
        let ctx = build_context(&[a, b]);
        let parts: Vec<&str> = ctx.split(CONTEXT_SEPARATOR).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("Commentary: first"));
        assert!(parts[1].contains("Commentary: second"));
    }

    #[test]
    fn formatting_is_idempotent() {
        let rs = vec![
            result("player_bio", "bio", json!({ "player": "MS Dhoni", "role": "wicketkeeper" })),
            result("team_stats", "stats", Value::Null),
        ];
        assert_eq!(build_context(&rs), build_context(&rs));
    }

    #[test]
    fn match_id_and_source_are_kept() {
        let mut r = result("match_info", "IPL 2023 final", json!({}));
        r.match_id = Some("m-1370353".into());
        r.source_url = Some("https://example.org/ipl/2023/final".into());
        let text = format_result(&r);
        assert!(text.contains("Match ID: m-1370353"));
        assert!(text.ends_with("Source: https://example.org/ipl/2023/final"));
    }

    #[test]
    fn empty_input_gives_empty_context() {
        assert_eq!(build_context(&[]), "");
    }
}
