//! Shared types for PICKEM.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the feed, ledger, and
//! trivia modules can depend on them without circular references.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Lifecycle status of a game, normalized from whatever the feed reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
}

impl GameStatus {
    /// Normalize a raw feed status string into the three-state lifecycle.
    ///
    /// Unknown strings fall back to `Scheduled` — an un-normalizable game
    /// must never be treated as settleable.
    pub fn normalize(raw: &str) -> Self {
        let s = raw.to_lowercase();
        if s == "post"
            || s.contains("final")
            || s.contains("end")
            || s.contains("complete")
        {
            GameStatus::Final
        } else if s == "in"
            || s.contains("in progress")
            || s.contains("live")
            || s.contains("halftime")
        {
            GameStatus::Live
        } else {
            GameStatus::Scheduled
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Scheduled => write!(f, "scheduled"),
            GameStatus::Live => write!(f, "live"),
            GameStatus::Final => write!(f, "final"),
        }
    }
}

/// A single game as supplied by the feed. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Feed event id, stable across fetches.
    pub id: String,
    pub week: u32,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub status: GameStatus,
    /// Present iff status is Final.
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

impl Game {
    /// Whether the game is still open for placing, editing, or
    /// cancelling wagers.
    pub fn is_wagerable(&self) -> bool {
        self.status == GameStatus::Scheduled
    }

    /// Both final scores, or None unless the game is Final with scores.
    pub fn final_scores(&self) -> Option<(u32, u32)> {
        if self.status != GameStatus::Final {
            return None;
        }
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => Some((h, a)),
            _ => None,
        }
    }

    /// Helper to build a scheduled game for tests.
    #[cfg(test)]
    pub fn sample_scheduled(id: &str, week: u32, home: &str, away: &str) -> Self {
        Game {
            id: id.to_string(),
            week,
            home_team: home.to_string(),
            away_team: away.to_string(),
            start_time: Utc::now() + chrono::Duration::days(3),
            status: GameStatus::Scheduled,
            home_score: None,
            away_score: None,
        }
    }

    /// Helper to build a completed game for tests.
    #[cfg(test)]
    pub fn sample_final(
        id: &str,
        week: u32,
        home: &str,
        home_score: u32,
        away: &str,
        away_score: u32,
    ) -> Self {
        Game {
            id: id.to_string(),
            week,
            home_team: home.to_string(),
            away_team: away.to_string(),
            start_time: Utc::now() - chrono::Duration::days(1),
            status: GameStatus::Final,
            home_score: Some(home_score),
            away_score: Some(away_score),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.final_scores() {
            Some((h, a)) => write!(
                f,
                "wk{} {} {} @ {} {} [{}]",
                self.week, self.away_team, a, self.home_team, h, self.status,
            ),
            None => write!(
                f,
                "wk{} {} @ {} [{}]",
                self.week, self.away_team, self.home_team, self.status,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Wager
// ---------------------------------------------------------------------------

/// Terminal state of a wager. A tied game settles as `Won` with
/// payout = stake (a push refund), matching the observable behavior
/// the rest of the system was built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WagerOutcome {
    Pending,
    Won,
    Lost,
}

impl fmt::Display for WagerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerOutcome::Pending => write!(f, "pending"),
            WagerOutcome::Won => write!(f, "won"),
            WagerOutcome::Lost => write!(f, "lost"),
        }
    }
}

/// One wager in the ledger history.
///
/// Week and team names are copied from the game at placement time so the
/// history survives feed changes; only `game_id` ties back to the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wager {
    pub id: Uuid,
    pub game_id: String,
    pub week: u32,
    pub home_team: String,
    pub away_team: String,
    pub picked_team: String,
    /// Always positive.
    pub stake: u64,
    pub outcome: WagerOutcome,
    /// 0 while pending or lost; stake on a push; 2x stake on a win.
    pub payout: u64,
    pub placed_at: DateTime<Utc>,
}

impl Wager {
    pub fn is_pending(&self) -> bool {
        self.outcome == WagerOutcome::Pending
    }
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wk{} {} @ {} | pick={} stake={} | {} (payout={})",
            self.week,
            self.away_team,
            self.home_team,
            self.picked_team,
            self.stake,
            self.outcome,
            self.payout,
        )
    }
}

// ---------------------------------------------------------------------------
// Trivia
// ---------------------------------------------------------------------------

/// The three question shapes the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    TrueFalse,
    MultipleChoice,
    Numeric,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::TrueFalse => write!(f, "true/false"),
            QuestionKind::MultipleChoice => write!(f, "multiple-choice"),
            QuestionKind::Numeric => write!(f, "numeric"),
        }
    }
}

/// Kind-specific answer data carried by a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnswerKey {
    Bool(bool),
    Choice {
        labels: Vec<String>,
        correct: usize,
    },
    Numeric {
        expected: i64,
        /// Absolute allowed deviation.
        tolerance: i64,
    },
}

impl AnswerKey {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerKey::Bool(_) => QuestionKind::TrueFalse,
            AnswerKey::Choice { .. } => QuestionKind::MultipleChoice,
            AnswerKey::Numeric { .. } => QuestionKind::Numeric,
        }
    }
}

/// A procedurally generated trivia question. Never mutated in place —
/// the session replaces it wholesale when a new one is requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub id: Uuid,
    pub prompt: String,
    pub explanation: String,
    pub reward: u64,
    pub key: AnswerKey,
}

impl TriviaQuestion {
    pub fn kind(&self) -> QuestionKind {
        self.key.kind()
    }
}

impl fmt::Display for TriviaQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (+{})", self.kind(), self.prompt, self.reward)
    }
}

/// Whether a session was started free or bought with coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    Free,
    Paid,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Free => write!(f, "free"),
            SessionKind::Paid => write!(f, "paid"),
        }
    }
}

// ---------------------------------------------------------------------------
// Persisted player state
// ---------------------------------------------------------------------------

/// Everything saved to disk between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub balance: u64,
    /// Insertion order is history order.
    pub wagers: Vec<Wager>,
    /// Not consumed by the core, round-tripped for the presentation layer.
    pub favorite_team: Option<String>,
    /// Calendar day of the last free trivia session.
    pub last_free_play: Option<NaiveDate>,
    /// Authoritative signal for the leave-session UI guard.
    pub session_active: bool,
}

impl PlayerState {
    pub fn new(initial_bankroll: u64) -> Self {
        Self {
            balance: initial_bankroll,
            wagers: Vec::new(),
            favorite_team: None,
            last_free_play: None,
            session_active: false,
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "balance={} wagers={} free_played={:?} session_active={}",
            self.balance,
            self.wagers.len(),
            self.last_free_play,
            self.session_active,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for PICKEM.
///
/// All of these are local, non-fatal rejections: the operation declines
/// to mutate state and the caller maps the variant to user feedback.
#[derive(Debug, thiserror::Error)]
pub enum PickemError {
    #[error("Stake must be positive")]
    InvalidStake,

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Game {0} is not open for wagering")]
    GameNotWagerable(String),

    #[error("Wager not found: {0}")]
    WagerNotFound(Uuid),

    #[error("Answer kind mismatch: question is {expected}, got {got}")]
    KindMismatch {
        expected: QuestionKind,
        got: QuestionKind,
    },

    #[error("No active trivia session")]
    NoActiveSession,

    #[error("Acknowledge the current explanation first")]
    AwaitingAck,

    #[error("No explanation awaiting acknowledgement")]
    NotAwaitingAck,

    #[error("Free trivia already played today")]
    FreePlayUsed,

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
