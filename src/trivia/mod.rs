//! Trivia session engine — a bounded, coin-earning quiz run.
//!
//! A session ends at 5 correct answers or 3 strikes. Free sessions are
//! gated to one per calendar day; paid sessions cost a flat fee and add
//! a coin penalty on wrong answers. The engine touches the `Ledger`
//! only to credit and debit coins.

pub mod generator;

use chrono::NaiveDate;
use rand::Rng;
use tracing::info;

use crate::ledger::Ledger;
use crate::types::{AnswerKey, Game, PickemError, QuestionKind, SessionKind, TriviaQuestion};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TriviaConfig {
    /// Up-front coin cost of a paid session.
    pub paid_session_cost: u64,
    /// Correct answers that complete a run.
    pub correct_target: u32,
    /// Wrong answers that end a run.
    pub max_strikes: u32,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            paid_session_cost: 250,
            correct_target: 5,
            max_strikes: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Session {
    kind: SessionKind,
    /// The calendar day a free session was started; recorded as the
    /// free-play day when the run terminates.
    free_day: Option<NaiveDate>,
    question: Option<TriviaQuestion>,
    correct: u32,
    strikes: u32,
    showing_explanation: bool,
}

/// What a single answer did to the run.
#[derive(Debug, Clone, Copy)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Coins credited on a correct answer.
    pub reward: u64,
    /// Penalty assessed on a paid-session miss (the actual debit
    /// saturates at a zero balance).
    pub penalty: u64,
    pub session_over: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct TriviaEngine {
    cfg: TriviaConfig,
    session: Option<Session>,
    last_free_play: Option<NaiveDate>,
}

impl TriviaEngine {
    pub fn new(cfg: TriviaConfig) -> Self {
        Self {
            cfg,
            session: None,
            last_free_play: None,
        }
    }

    /// Rebuild from persisted state.
    pub fn restore(cfg: TriviaConfig, last_free_play: Option<NaiveDate>) -> Self {
        Self {
            cfg,
            session: None,
            last_free_play,
        }
    }

    // -- Query surface ---------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_question(&self) -> Option<&TriviaQuestion> {
        self.session.as_ref().and_then(|s| s.question.as_ref())
    }

    pub fn correct_count(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.correct)
    }

    pub fn strikes(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.strikes)
    }

    pub fn showing_explanation(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.showing_explanation)
    }

    pub fn last_free_play(&self) -> Option<NaiveDate> {
        self.last_free_play
    }

    /// Whether the daily free session is still available on `today`.
    pub fn can_play_free(&self, today: NaiveDate) -> bool {
        self.last_free_play != Some(today)
    }

    // -- Starting sessions -----------------------------------------------

    /// Start the once-per-day free session.
    pub fn start_free(
        &mut self,
        today: NaiveDate,
        games: &[Game],
        rng: &mut impl Rng,
    ) -> Result<(), PickemError> {
        if !self.can_play_free(today) {
            return Err(PickemError::FreePlayUsed);
        }
        self.begin(SessionKind::Free, Some(today), games, rng);
        Ok(())
    }

    /// Start a paid session, debiting the fee up front.
    pub fn start_paid(
        &mut self,
        ledger: &mut Ledger,
        games: &[Game],
        rng: &mut impl Rng,
    ) -> Result<(), PickemError> {
        ledger.debit(self.cfg.paid_session_cost)?;
        self.begin(SessionKind::Paid, None, games, rng);
        Ok(())
    }

    fn begin(
        &mut self,
        kind: SessionKind,
        free_day: Option<NaiveDate>,
        games: &[Game],
        rng: &mut impl Rng,
    ) {
        let question = generator::generate_question(games, rng);
        info!(kind = %kind, question = %question, "Trivia session started");
        self.session = Some(Session {
            kind,
            free_day,
            question: Some(question),
            correct: 0,
            strikes: 0,
            showing_explanation: false,
        });
    }

    // -- Answering -------------------------------------------------------

    /// Answer the current true/false question.
    pub fn answer_bool(
        &mut self,
        answer: bool,
        ledger: &mut Ledger,
    ) -> Result<AnswerOutcome, PickemError> {
        self.answer(QuestionKind::TrueFalse, ledger, |key| match key {
            AnswerKey::Bool(expected) => *expected == answer,
            _ => false,
        })
    }

    /// Answer the current multiple-choice question by choice index.
    pub fn answer_choice(
        &mut self,
        index: usize,
        ledger: &mut Ledger,
    ) -> Result<AnswerOutcome, PickemError> {
        self.answer(QuestionKind::MultipleChoice, ledger, |key| match key {
            AnswerKey::Choice { correct, .. } => *correct == index,
            _ => false,
        })
    }

    /// Answer the current numeric question; correct within tolerance.
    pub fn answer_numeric(
        &mut self,
        value: i64,
        ledger: &mut Ledger,
    ) -> Result<AnswerOutcome, PickemError> {
        self.answer(QuestionKind::Numeric, ledger, |key| match key {
            AnswerKey::Numeric { expected, tolerance } => {
                (value - expected).abs() <= *tolerance
            }
            _ => false,
        })
    }

    fn answer(
        &mut self,
        submitted: QuestionKind,
        ledger: &mut Ledger,
        check: impl FnOnce(&AnswerKey) -> bool,
    ) -> Result<AnswerOutcome, PickemError> {
        let session = self.session.as_mut().ok_or(PickemError::NoActiveSession)?;
        if session.showing_explanation {
            return Err(PickemError::AwaitingAck);
        }
        let question = session
            .question
            .as_ref()
            .ok_or(PickemError::NoActiveSession)?;
        let expected = question.kind();
        if expected != submitted {
            return Err(PickemError::KindMismatch {
                expected,
                got: submitted,
            });
        }

        let correct = check(&question.key);
        let reward = question.reward;
        let mut penalty = 0;

        if correct {
            ledger.credit(reward);
            session.correct += 1;
        } else {
            session.strikes += 1;
            if session.kind == SessionKind::Paid {
                penalty = penalty_for(reward);
                ledger.debit_saturating(penalty);
            }
        }
        session.showing_explanation = true;

        let session_over = session.correct >= self.cfg.correct_target
            || session.strikes >= self.cfg.max_strikes;

        info!(
            correct,
            reward = if correct { reward } else { 0 },
            penalty,
            run_correct = session.correct,
            strikes = session.strikes,
            session_over,
            balance = ledger.balance(),
            "Trivia answer evaluated"
        );

        if session_over {
            self.end_session();
        }

        Ok(AnswerOutcome {
            correct,
            reward: if correct { reward } else { 0 },
            penalty,
            session_over,
        })
    }

    /// Acknowledge the explanation and move to the next question.
    /// Valid only while an explanation is showing in a live session.
    pub fn proceed(&mut self, games: &[Game], rng: &mut impl Rng) -> Result<(), PickemError> {
        let session = self.session.as_mut().ok_or(PickemError::NoActiveSession)?;
        if !session.showing_explanation {
            return Err(PickemError::NotAwaitingAck);
        }
        session.showing_explanation = false;
        session.question = Some(generator::generate_question(games, rng));
        Ok(())
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            if session.kind == SessionKind::Free {
                self.last_free_play = session.free_day;
            }
            info!(
                kind = %session.kind,
                correct = session.correct,
                strikes = session.strikes,
                "Trivia session ended"
            );
        }
    }

    /// Swap in a fixed question, bypassing the generator.
    #[cfg(test)]
    fn set_question(&mut self, question: TriviaQuestion) {
        if let Some(session) = self.session.as_mut() {
            session.question = Some(question);
            session.showing_explanation = false;
        }
    }
}

/// Paid-session miss penalty: 20% of the missed reward, clamped to
/// [50, 200], rounded to the nearest multiple of 25.
fn penalty_for(reward: u64) -> u64 {
    let base = ((reward as f64) * 0.2).round() as u64;
    let base = base.clamp(50, 200);
    let rounded = ((base as f64 / 25.0).round() as u64) * 25;
    rounded.clamp(50, 200)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
