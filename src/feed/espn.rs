//! ESPN NFL scoreboard feed.
//!
//! Base URL: `https://site.api.espn.com/apis/site/v2/sports/football/nfl`
//! No auth required. We decode only the fields the core needs and
//! normalize ESPN's status vocabulary into scheduled/live/final.
//! Retries and caching are the caller's concern.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::GameFeed;
use crate::types::{Game, GameStatus};

const DEFAULT_BASE_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl";

// ---------------------------------------------------------------------------
// API response types (ESPN JSON -> Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    week: Option<WeekRef>,
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct WeekRef {
    number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Event {
    id: String,
    #[serde(default)]
    week: Option<WeekRef>,
    #[serde(default)]
    competitions: Vec<Competition>,
}

#[derive(Debug, Deserialize)]
struct Competition {
    #[serde(default)]
    date: Option<String>,
    status: Status,
    #[serde(default)]
    competitors: Vec<Competitor>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(rename = "type")]
    kind: StatusType,
}

#[derive(Debug, Deserialize)]
struct StatusType {
    #[serde(default)]
    name: Option<String>,
    /// "pre" | "in" | "post"
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Competitor {
    home_away: String,
    /// Scores arrive as strings; unparseable ones count as absent.
    #[serde(default)]
    score: Option<String>,
    team: Team,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Team {
    display_name: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct EspnFeed {
    http: Client,
    base_url: String,
}

impl EspnFeed {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("PICKEM/0.1.0")
            .build()
            .context("Failed to build HTTP client for ESPN feed")?;
        Ok(Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    async fn fetch_scoreboard(&self, week: Option<u32>) -> Result<ScoreboardResponse> {
        let url = match week {
            Some(w) => format!("{}/scoreboard?week={w}", self.base_url),
            None => format!("{}/scoreboard", self.base_url),
        };
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("ESPN scoreboard request failed")?
            .error_for_status()
            .context("ESPN scoreboard returned an error status")?;
        response
            .json::<ScoreboardResponse>()
            .await
            .context("Failed to decode ESPN scoreboard response")
    }

    fn convert_event(event: &Event, requested_week: u32) -> Option<Game> {
        let comp = event.competitions.first()?;
        let week = event
            .week
            .as_ref()
            .and_then(|w| w.number)
            .unwrap_or(requested_week);

        let home = comp.competitors.iter().find(|c| c.home_away == "home")?;
        let away = comp.competitors.iter().find(|c| c.home_away == "away")?;

        let status_raw = comp
            .status
            .kind
            .state
            .as_deref()
            .or(comp.status.kind.name.as_deref())
            .unwrap_or("");
        let status = GameStatus::normalize(status_raw);

        let start_time = comp
            .date
            .as_deref()
            .and_then(parse_espn_date)
            .unwrap_or_else(Utc::now);

        Some(Game {
            id: event.id.clone(),
            week,
            home_team: home.team.display_name.clone(),
            away_team: away.team.display_name.clone(),
            start_time,
            status,
            home_score: parse_score(home.score.as_deref()),
            away_score: parse_score(away.score.as_deref()),
        })
    }
}

/// ESPN emits minute-precision UTC timestamps like `2026-09-13T17:00Z`;
/// some endpoints use full RFC 3339.
fn parse_espn_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ") {
        return Some(dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_score(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[async_trait]
impl GameFeed for EspnFeed {
    async fn fetch_week(&self, week: u32) -> Result<Vec<Game>> {
        let response = self.fetch_scoreboard(Some(week)).await?;

        let mut games = Vec::with_capacity(response.events.len());
        for event in &response.events {
            match Self::convert_event(event, week) {
                Some(game) => games.push(game),
                None => warn!(event = %event.id, "Skipping malformed scoreboard event"),
            }
        }
        debug!(week, count = games.len(), "Fetched week from ESPN");
        Ok(games)
    }

    async fn current_week(&self) -> Result<u32> {
        let response = self.fetch_scoreboard(None).await?;
        response
            .week
            .and_then(|w| w.number)
            .or_else(|| {
                // Some responses omit the top-level week; fall back to
                // the events themselves.
                response
                    .events
                    .iter()
                    .filter_map(|e| e.week.as_ref().and_then(|w| w.number))
                    .max()
            })
            .ok_or_else(|| anyhow!("ESPN scoreboard reported no current week"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
