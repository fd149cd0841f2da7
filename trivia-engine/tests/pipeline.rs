use std::sync::{Arc, Mutex};

use ai_llm_service::{AiLlmError, TextGenerator};
use async_trait::async_trait;
use serde_json::{Value, json};
use sports_index::{IndexError, RecordKind, SearchProvider, SearchResult, render::render_record};
use trivia_engine::{
    CONTEXT_SEPARATOR, PipelineConfig, Route, TriviaPipeline, build_context, fallback_trivia,
    format_result, sample_trivia,
};

/// Records every prompt; replies with a fixed text or fails.
struct StubLlm {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubLlm {
    async fn generate(&self, prompt: &str, _system: Option<&str>) -> ai_llm_service::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(AiLlmError::Timeout(std::time::Duration::from_secs(1))),
        }
    }
}

enum StubSearch {
    NoIndex,
    Hits(Vec<SearchResult>),
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchResult>, IndexError> {
        match self {
            StubSearch::NoIndex => Err(IndexError::NoIndex {
                collection: "sports_chunks".into(),
            }),
            StubSearch::Hits(hits) => Ok(hits.iter().take(limit).cloned().collect()),
        }
    }
}

fn valid_reply() -> String {
    format!(
        "Here is your quiz:\n{}",
        serde_json::to_string(&sample_trivia()).unwrap()
    )
}

fn final_matches() -> Vec<SearchResult> {
    [
        ("2021", "Chennai Super Kings", "Kolkata Knight Riders", "Dubai"),
        ("2022", "Gujarat Titans", "Rajasthan Royals", "Ahmedabad"),
        ("2023", "Chennai Super Kings", "Gujarat Titans", "Ahmedabad"),
    ]
    .into_iter()
    .map(|(season, a, b, venue)| {
        render_record(
            RecordKind::MatchInfo,
            &json!({
                "id": format!("final-{season}"),
                "league": "IPL",
                "season": season,
                "teams": [a, b],
                "venue": venue,
                "date": format!("{season}-05-29"),
                "result": { "winner": a, "margin": "5 wickets" }
            }),
        )
    })
    .collect()
}

fn pipeline(
    generation: Arc<StubLlm>,
    search: Option<StubSearch>,
) -> (TriviaPipeline, Arc<StubLlm>) {
    let normalizer = StubLlm::replying("IPL finals");
    let search = search.map(|s| Arc::new(s) as Arc<dyn SearchProvider>);
    let p = TriviaPipeline::new(
        normalizer.clone(),
        generation,
        search,
        PipelineConfig::default(),
    );
    (p, normalizer)
}

#[tokio::test]
async fn failing_backend_still_yields_fallback_set() {
    let (p, _) = pipeline(StubLlm::failing(), None);
    let out = p.run("any topic").await.unwrap();
    assert_eq!(out.route, Route::Plain);
    assert_eq!(out.response, fallback_trivia());
    assert!(out.response.ensure_valid().is_ok());
}

#[tokio::test]
async fn malformed_reply_yields_fallback_set() {
    let (p, _) = pipeline(StubLlm::replying("{\"data\": []}"), None);
    assert_eq!(p.generate("IPL").await.unwrap(), fallback_trivia());
}

#[tokio::test]
async fn no_index_behaves_like_zero_hits() {
    let gen_a = StubLlm::replying(valid_reply());
    let gen_b = StubLlm::replying(valid_reply());
    let (no_index, _) = pipeline(gen_a.clone(), Some(StubSearch::NoIndex));
    let (empty, _) = pipeline(gen_b.clone(), Some(StubSearch::Hits(Vec::new())));

    let a = no_index.run("IPL finals").await.unwrap();
    let b = empty.run("IPL finals").await.unwrap();

    assert_eq!(a, b);
    assert_eq!(a.route, Route::Plain);
    assert_eq!(gen_a.prompts(), gen_b.prompts());
}

#[tokio::test]
async fn retrieved_matches_feed_enhanced_prompt() {
    let hits = final_matches();
    let generation = StubLlm::replying(valid_reply());
    let (p, normalizer) = pipeline(generation.clone(), Some(StubSearch::Hits(hits.clone())));

    let out = p.run("IPL finals").await.unwrap();
    assert_eq!(out.route, Route::Enhanced);
    assert_eq!(out.response, sample_trivia());

    let context = build_context(&hits);
    assert_eq!(context.matches("Match Info:").count(), 3);
    assert_eq!(context.matches(CONTEXT_SEPARATOR).count(), 2);

    let prompts = generation.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Topic: IPL finals"));
    assert!(prompts[0].contains(&context));
    assert_eq!(normalizer.prompts().len(), 1);
}

#[tokio::test]
async fn enhanced_failure_retries_plain_then_falls_back() {
    let generation = StubLlm::failing();
    let (p, _) = pipeline(generation.clone(), Some(StubSearch::Hits(final_matches())));

    let out = p.run("IPL finals").await.unwrap();
    assert_eq!(out.response, fallback_trivia());

    let prompts = generation.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("Match Info:"));
    assert!(!prompts[1].contains("Match Info:"));
}

#[tokio::test]
async fn disabled_retrieval_skips_normalizer_and_search() {
    let generation = StubLlm::replying(valid_reply());
    let normalizer = StubLlm::replying("ignored");
    let p = TriviaPipeline::new(
        normalizer.clone(),
        generation,
        Some(Arc::new(StubSearch::Hits(final_matches()))),
        PipelineConfig {
            retrieval_enabled: false,
            top_k: 5,
        },
    );
    assert!(!p.retrieval_active());
    let out = p.run("IPL").await.unwrap();
    assert_eq!(out.route, Route::Plain);
    assert!(normalizer.prompts().is_empty());
}

fn sample_record(kind: RecordKind) -> Value {
    match kind {
        RecordKind::TeamProfile => json!({
            "team_id": "csk",
            "team_name": "Chennai Super Kings",
            "owner": "Chennai Super Kings Cricket Ltd",
            "home_ground": { "name": "M. A. Chidambaram Stadium", "city": "Chennai" },
            "titles": [{ "name": "IPL", "count": 5, "years": [2010, 2011, 2018, 2021, 2023] }],
            "bio": "Founded in 2008, the franchise is captained for years by MS Dhoni.",
            "season": "2024"
        }),
        RecordKind::Commentary => json!({
            "id": "c-1",
            "season": "2023",
            "match_id": "final-2023",
            "innings": 2,
            "over": 15,
            "ball": 6,
            "batting_team": "Chennai Super Kings",
            "bowling_team": "Gujarat Titans",
            "batter": "Ravindra Jadeja",
            "bowler": "Mohit Sharma",
            "runs_off_bat": 4,
            "extras": 0,
            "text": "Jadeja drives for four to win the title",
            "date": "2023-05-29"
        }),
        RecordKind::MatchInfo => json!({
            "id": "final-2023",
            "league": "IPL",
            "season": "2023",
            "teams": ["Chennai Super Kings", "Gujarat Titans"],
            "venue": "Narendra Modi Stadium",
            "date": "2023-05-29",
            "toss_winner": "Chennai Super Kings",
            "toss_decision": "field",
            "result": { "winner": "Chennai Super Kings", "margin": "5 wickets" },
            "match_id": "m-1370353",
            "source_url": "https://example.org/ipl/2023/final"
        }),
        RecordKind::PlayerBio => json!({
            "id": "p-dhoni",
            "player": "MS Dhoni",
            "dob": "1981-07-07",
            "role": "wicketkeeper-batter",
            "batting_style": "Right-hand bat",
            "bowling_style": "Right-arm medium",
            "teams": ["Chennai Super Kings", "Rising Pune Supergiant"],
            "highlights": ["5 IPL titles as captain"],
            "source_url": "https://example.org/players/ms-dhoni"
        }),
        RecordKind::PlayerStats => json!({
            "id": "ps-kohli",
            "player": "Virat Kohli",
            "league": "IPL",
            "career": { "runs": 7263, "strike_rate": 130.0, "matches": 237, "avg": 37.2 },
            "by_season": [{ "season": "2016", "runs": 973, "sr": 152.0, "hs": 113 }],
            "as_of": "2024-01-01"
        }),
        RecordKind::TeamStats => json!({
            "id": "ts-mi-2020",
            "team": "Mumbai Indians",
            "league": "IPL",
            "season": "2020",
            "summary": { "wins": 11, "losses": 5, "nrr": 1.107 },
            "highest_total": { "runs": 208, "opponent": "Sunrisers Hyderabad", "date": "2020-10-04" }
        }),
    }
}

#[test]
fn formatter_keeps_every_rendered_facet() {
    for kind in RecordKind::ALL {
        let rendered = render_record(kind, &sample_record(kind));
        let text = format_result(&rendered);

        assert!(text.contains(&rendered.embedded_text), "{kind}: text missing\n{text}");
        for team in &rendered.teams {
            assert!(text.contains(team.as_str()), "{kind}: team {team} missing\n{text}");
        }
        for player in &rendered.players {
            assert!(text.contains(player.as_str()), "{kind}: player {player} missing\n{text}");
        }
        for facet in [&rendered.sport, &rendered.league, &rendered.season] {
            if facet != "unknown" {
                assert!(text.contains(facet.as_str()), "{kind}: facet {facet} missing\n{text}");
            }
        }
        if let Some(date) = &rendered.date {
            assert!(text.contains(date.as_str()), "{kind}: date missing\n{text}");
        }
        if let Some(match_id) = &rendered.match_id {
            assert!(text.contains(match_id.as_str()), "{kind}: match id missing\n{text}");
        }
        if let Some(url) = &rendered.source_url {
            assert!(text.contains(url.as_str()), "{kind}: source url missing\n{text}");
        }
    }
}

#[test]
fn round_trip_samples_carry_ids_and_sources() {
    let populated = RecordKind::ALL
        .into_iter()
        .map(|kind| render_record(kind, &sample_record(kind)))
        .filter(|r| r.match_id.is_some() && r.source_url.is_some())
        .count();
    assert!(populated >= 1);
}

#[test]
fn formatter_is_pure() {
    let hits = final_matches();
    assert_eq!(build_context(&hits), build_context(&hits));
}
