//! Procedural question generation.
//!
//! Questions are derived from the most recently completed week of games.
//! All content lives in data tables: the true/false bank is a list of
//! (statement builder, truth predicate, explanation style) entries
//! evaluated against the derived facts of one game, so generation logic
//! stays separate from wording.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::types::{AnswerKey, Game, GameStatus, TriviaQuestion};

// ---------------------------------------------------------------------------
// Derived facts
// ---------------------------------------------------------------------------

/// Everything we can ask about a completed game, computed once.
#[derive(Debug, Clone)]
pub struct GameFacts {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

impl GameFacts {
    /// Facts for a final game with both scores, None otherwise.
    pub fn from_game(game: &Game) -> Option<Self> {
        let (home_score, away_score) = game.final_scores()?;
        Some(Self {
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            home_score,
            away_score,
        })
    }

    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }

    pub fn tie(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn margin(&self) -> u32 {
        self.home_score.abs_diff(self.away_score)
    }

    pub fn total(&self) -> u32 {
        self.home_score + self.away_score
    }

    pub fn home_odd(&self) -> bool {
        self.home_score % 2 == 1
    }

    pub fn away_odd(&self) -> bool {
        self.away_score % 2 == 1
    }

    pub fn total_odd(&self) -> bool {
        self.total() % 2 == 1
    }

    /// Decided by 8 points or fewer.
    pub fn one_score(&self) -> bool {
        self.margin() <= 8
    }

    /// Decided by 17 points or more.
    pub fn blowout(&self) -> bool {
        self.margin() >= 17
    }

    /// Index into `MARGIN_BUCKETS`.
    pub fn margin_bucket(&self) -> usize {
        match self.margin() {
            0..=3 => 0,
            4..=7 => 1,
            8..=16 => 2,
            _ => 3,
        }
    }

    /// Index into `TOTAL_BUCKETS`.
    pub fn total_bucket(&self) -> usize {
        match self.total() {
            0..=34 => 0,
            35..=49 => 1,
            50..=59 => 2,
            _ => 3,
        }
    }

    // -- Explanation fragments -------------------------------------------

    fn score_line(&self) -> String {
        format!(
            "Final score: {} {} @ {} {}.",
            self.away_team, self.away_score, self.home_team, self.home_score,
        )
    }

    fn margin_line(&self) -> String {
        let label = if self.one_score() {
            "one-score"
        } else if self.blowout() {
            "blowout"
        } else {
            "two-score+"
        };
        format!("Margin: {} ({label}).", self.margin())
    }

    fn total_line(&self) -> String {
        format!(
            "Total points: {} ({}).",
            self.total(),
            if self.total_odd() { "odd" } else { "even" },
        )
    }
}

// ---------------------------------------------------------------------------
// True/false template bank
// ---------------------------------------------------------------------------

/// Which explanation fragments accompany a statement.
#[derive(Debug, Clone, Copy)]
enum Explain {
    Score,
    ScoreMargin,
    ScoreTotal,
    Shutout,
}

impl Explain {
    fn build(self, facts: &GameFacts) -> String {
        match self {
            Explain::Score => facts.score_line(),
            Explain::ScoreMargin => format!("{} {}", facts.score_line(), facts.margin_line()),
            Explain::ScoreTotal => format!("{} {}", facts.score_line(), facts.total_line()),
            Explain::Shutout => format!("{} One side scored 0.", facts.score_line()),
        }
    }
}

struct TfTemplate {
    statement: fn(&GameFacts) -> String,
    truth: fn(&GameFacts) -> bool,
    explain: Explain,
}

const TF_TEMPLATES: &[TfTemplate] = &[
    TfTemplate {
        statement: |f| format!("{} defeated {}.", f.home_team, f.away_team),
        truth: |f| f.home_won(),
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| format!("{} outscored {}.", f.away_team, f.home_team),
        truth: |f| !f.home_won() && !f.tie(),
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "The showdown between {} and {} was decided by more than 10 points.",
                f.away_team, f.home_team,
            )
        },
        truth: |f| f.margin() > 10,
        explain: Explain::ScoreMargin,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "{} @ {} was a one-score game (8 points or fewer).",
                f.away_team, f.home_team,
            )
        },
        truth: |f| f.one_score(),
        explain: Explain::ScoreMargin,
    },
    TfTemplate {
        statement: |f| {
            format!("{} @ {} was a blowout (17+ point margin).", f.away_team, f.home_team)
        },
        truth: |f| f.blowout(),
        explain: Explain::ScoreMargin,
    },
    TfTemplate {
        statement: |f| format!("{} put up at least 20 points.", f.home_team),
        truth: |f| f.home_score >= 20,
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| format!("{} put up at least 20 points.", f.away_team),
        truth: |f| f.away_score >= 20,
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| format!("{} exploded for 30 or more points.", f.home_team),
        truth: |f| f.home_score >= 30,
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| format!("{} was held under 14 points.", f.away_team),
        truth: |f| f.away_score < 14,
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!("One team pitched a shutout in {} @ {}.", f.away_team, f.home_team)
        },
        truth: |f| f.home_score == 0 || f.away_score == 0,
        explain: Explain::Shutout,
    },
    TfTemplate {
        statement: |_| "Both teams reached double digits.".to_string(),
        truth: |f| f.home_score >= 10 && f.away_score >= 10,
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!("The total points in {} @ {} were odd.", f.away_team, f.home_team)
        },
        truth: |f| f.total_odd(),
        explain: Explain::ScoreTotal,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "Both {} and {} finished with odd scores.",
                f.away_team, f.home_team,
            )
        },
        truth: |f| f.home_odd() && f.away_odd(),
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "At least one of {} or {} finished with an even score.",
                f.away_team, f.home_team,
            )
        },
        truth: |f| !f.home_odd() || !f.away_odd(),
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "{} and {} combined for more than 40 points.",
                f.home_team, f.away_team,
            )
        },
        truth: |f| f.total() > 40,
        explain: Explain::ScoreTotal,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "{} and {} combined for under 35 points.",
                f.away_team, f.home_team,
            )
        },
        truth: |f| f.total() < 35,
        explain: Explain::ScoreTotal,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "{} @ {} was decided by a field goal or less (3 points or fewer).",
                f.away_team, f.home_team,
            )
        },
        truth: |f| f.margin() <= 3,
        explain: Explain::ScoreMargin,
    },
    TfTemplate {
        statement: |f| format!("{} finished on top at the final whistle.", f.home_team),
        truth: |f| f.home_won(),
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "Neither {} nor {} reached 20 points.",
                f.away_team, f.home_team,
            )
        },
        truth: |f| f.home_score < 20 && f.away_score < 20,
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "{} and {} combined for an even number of points.",
                f.away_team, f.home_team,
            )
        },
        truth: |f| !f.total_odd(),
        explain: Explain::ScoreTotal,
    },
    TfTemplate {
        statement: |f| format!("{} held {} to 10 points or fewer.", f.home_team, f.away_team),
        truth: |f| f.away_score <= 10,
        explain: Explain::Score,
    },
    TfTemplate {
        statement: |f| {
            format!(
                "The clash at {} was a nail-biter (decided by 2 points or fewer).",
                f.home_team,
            )
        },
        truth: |f| f.margin() <= 2,
        explain: Explain::ScoreMargin,
    },
];

const TF_REWARDS: &[u64] = &[100, 150, 200, 250];

pub const MARGIN_BUCKETS: [&str; 4] = ["1–3", "4–7", "8–16", "17+"];
pub const TOTAL_BUCKETS: [&str; 4] = ["Under 35", "35–49", "50–59", "60+"];

const REWARD_WINNER: u64 = 300;
const REWARD_BUCKET: u64 = 350;
const REWARD_TOTAL_POINTS: u64 = 400;
const REWARD_MARGIN: u64 = 450;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Highest week number among completed games, if any.
pub fn most_recent_final_week(games: &[Game]) -> Option<u32> {
    games
        .iter()
        .filter(|g| g.status == GameStatus::Final)
        .map(|g| g.week)
        .max()
}

/// Generate one question from the supplied snapshot.
///
/// Candidates are the completed games of the most recent finished week;
/// one is picked uniformly at random. With no usable completed game the
/// fixed fallback question is returned.
pub fn generate_question(games: &[Game], rng: &mut impl Rng) -> TriviaQuestion {
    let target_week = most_recent_final_week(games);

    let candidates: Vec<&Game> = games
        .iter()
        .filter(|g| target_week.map_or(true, |w| g.week == w))
        .filter(|g| g.final_scores().is_some())
        .collect();

    // Candidates are pre-filtered to games with final scores.
    let Some(facts) = candidates.choose(rng).and_then(|g| GameFacts::from_game(g)) else {
        return default_question();
    };

    // Kind weights: 50% true/false, 35% multiple-choice, 15% numeric.
    let roll = rng.gen_range(0..100);
    if roll < 50 {
        let template = TF_TEMPLATES.choose(rng).unwrap_or(&TF_TEMPLATES[0]);
        let reward = *TF_REWARDS.choose(rng).unwrap_or(&200);
        true_false_question(&facts, template, reward)
    } else if roll < 85 {
        match rng.gen_range(0..3) {
            0 => winner_question(&facts),
            1 => margin_bucket_question(&facts),
            _ => total_bucket_question(&facts),
        }
    } else if rng.gen_bool(0.5) {
        total_points_question(&facts)
    } else {
        margin_question(&facts)
    }
}

/// Fixed fallback when the feed has no completed game at all.
pub fn default_question() -> TriviaQuestion {
    TriviaQuestion {
        id: Uuid::new_v4(),
        prompt: "True or False: The NFL has 32 teams.".to_string(),
        explanation: "The league has fielded 32 teams since 2002.".to_string(),
        reward: 100,
        key: AnswerKey::Bool(true),
    }
}

fn true_false_question(
    facts: &GameFacts,
    template: &TfTemplate,
    reward: u64,
) -> TriviaQuestion {
    TriviaQuestion {
        id: Uuid::new_v4(),
        prompt: format!("True or False: {}", (template.statement)(facts)),
        explanation: template.explain.build(facts),
        reward,
        key: AnswerKey::Bool((template.truth)(facts)),
    }
}

fn winner_question(facts: &GameFacts) -> TriviaQuestion {
    let correct = if facts.tie() {
        2
    } else if facts.home_won() {
        1
    } else {
        0
    };
    TriviaQuestion {
        id: Uuid::new_v4(),
        prompt: format!(
            "Who emerged with the higher score in {} @ {}?",
            facts.away_team, facts.home_team,
        ),
        explanation: facts.score_line(),
        reward: REWARD_WINNER,
        key: AnswerKey::Choice {
            labels: vec![
                facts.away_team.clone(),
                facts.home_team.clone(),
                "Tie".to_string(),
            ],
            correct,
        },
    }
}

fn margin_bucket_question(facts: &GameFacts) -> TriviaQuestion {
    TriviaQuestion {
        id: Uuid::new_v4(),
        prompt: format!(
            "What was the margin of victory in {} @ {}? (choose the range)",
            facts.away_team, facts.home_team,
        ),
        explanation: format!("{} {}", facts.score_line(), facts.margin_line()),
        reward: REWARD_BUCKET,
        key: AnswerKey::Choice {
            labels: MARGIN_BUCKETS.iter().map(|s| s.to_string()).collect(),
            correct: facts.margin_bucket(),
        },
    }
}

fn total_bucket_question(facts: &GameFacts) -> TriviaQuestion {
    TriviaQuestion {
        id: Uuid::new_v4(),
        prompt: format!(
            "What was the combined score in {} @ {}? (choose the range)",
            facts.away_team, facts.home_team,
        ),
        explanation: format!("{} {}", facts.score_line(), facts.total_line()),
        reward: REWARD_BUCKET,
        key: AnswerKey::Choice {
            labels: TOTAL_BUCKETS.iter().map(|s| s.to_string()).collect(),
            correct: facts.total_bucket(),
        },
    }
}

fn total_points_question(facts: &GameFacts) -> TriviaQuestion {
    TriviaQuestion {
        id: Uuid::new_v4(),
        prompt: format!(
            "How many total points were scored in {} @ {}? (exact within \u{00b1}3)",
            facts.away_team, facts.home_team,
        ),
        explanation: format!("{} {}", facts.score_line(), facts.total_line()),
        reward: REWARD_TOTAL_POINTS,
        key: AnswerKey::Numeric {
            expected: facts.total() as i64,
            tolerance: 3,
        },
    }
}

fn margin_question(facts: &GameFacts) -> TriviaQuestion {
    TriviaQuestion {
        id: Uuid::new_v4(),
        prompt: format!(
            "What was the margin of victory in {} @ {}? (exact within \u{00b1}1)",
            facts.away_team, facts.home_team,
        ),
        explanation: format!("{} {}", facts.score_line(), facts.margin_line()),
        reward: REWARD_MARGIN,
        key: AnswerKey::Numeric {
            expected: facts.margin() as i64,
            tolerance: 1,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
