//! Mock game feed for integration testing.
//!
//! Provides a deterministic `GameFeed` implementation backed by
//! in-memory week snapshots, fully controllable from test code with
//! no network involved.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use pickem::feed::GameFeed;
use pickem::types::{Game, GameStatus};

/// A deterministic in-memory feed.
pub struct MockFeed {
    current_week: u32,
    weeks: Mutex<HashMap<u32, Vec<Game>>>,
    /// If set, all operations will return this error.
    force_error: Mutex<Option<String>>,
}

impl MockFeed {
    pub fn new(current_week: u32) -> Self {
        Self {
            current_week,
            weeks: Mutex::new(HashMap::new()),
            force_error: Mutex::new(None),
        }
    }

    /// Replace the snapshot for a week.
    pub fn set_week(&self, week: u32, games: Vec<Game>) {
        self.weeks.lock().unwrap().insert(week, games);
    }

    /// Force all subsequent operations to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    fn check_error(&self) -> Result<()> {
        match self.force_error.lock().unwrap().as_ref() {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GameFeed for MockFeed {
    async fn fetch_week(&self, week: u32) -> Result<Vec<Game>> {
        self.check_error()?;
        Ok(self
            .weeks
            .lock()
            .unwrap()
            .get(&week)
            .cloned()
            .unwrap_or_default())
    }

    async fn current_week(&self) -> Result<u32> {
        self.check_error()?;
        Ok(self.current_week)
    }
}

// ---------------------------------------------------------------------------
// Game builders
// ---------------------------------------------------------------------------

pub fn scheduled_game(id: &str, week: u32, home: &str, away: &str) -> Game {
    Game {
        id: id.to_string(),
        week,
        home_team: home.to_string(),
        away_team: away.to_string(),
        start_time: Utc::now() + Duration::days(2),
        status: GameStatus::Scheduled,
        home_score: None,
        away_score: None,
    }
}

pub fn final_game(
    id: &str,
    week: u32,
    home: &str,
    home_score: u32,
    away: &str,
    away_score: u32,
) -> Game {
    Game {
        id: id.to_string(),
        week,
        home_team: home.to_string(),
        away_team: away.to_string(),
        start_time: Utc::now() - Duration::days(1),
        status: GameStatus::Final,
        home_score: Some(home_score),
        away_score: Some(away_score),
    }
}
