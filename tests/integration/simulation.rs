//! End-to-end scenarios: ledger against a feed, trivia against a
//! ledger, and state surviving a save/load cycle.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use pickem::feed::GameFeed;
use pickem::ledger::Ledger;
use pickem::storage;
use pickem::trivia::{TriviaConfig, TriviaEngine};
use pickem::types::{AnswerKey, PlayerState, WagerOutcome};

use crate::mock_feed::{final_game, scheduled_game, MockFeed};

fn temp_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("pickem_sim_{}.json", Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

#[tokio::test]
async fn wager_lifecycle_against_the_feed() {
    // Spec scenario: bankroll 10000, 500 on the Lions, Lions win 24-20.
    let feed = MockFeed::new(12);
    feed.set_week(12, vec![scheduled_game("gameA", 12, "Lions", "Bears")]);

    let mut ledger = Ledger::new(10_000);
    let week = feed.current_week().await.unwrap();
    let games = feed.fetch_week(week).await.unwrap();
    let id = ledger.place(&games[0], "Lions", 500).unwrap();
    assert_eq!(ledger.balance(), 9_500);

    // Next fetch reports the game final.
    feed.set_week(12, vec![final_game("gameA", 12, "Lions", 24, "Bears", 20)]);
    let games = feed.fetch_week(week).await.unwrap();
    let settled = ledger.settle(&games);

    assert_eq!(settled, vec![id]);
    let wager = ledger.find(id).unwrap();
    assert_eq!(wager.outcome, WagerOutcome::Won);
    assert_eq!(wager.payout, 1_000);
    assert_eq!(ledger.balance(), 10_500);

    // Re-settling the same snapshot is a no-op.
    let again = ledger.settle(&games);
    assert!(again.is_empty());
    assert_eq!(ledger.balance(), 10_500);
}

#[tokio::test]
async fn edits_and_cancels_only_before_kickoff() {
    let feed = MockFeed::new(12);
    feed.set_week(
        12,
        vec![
            scheduled_game("g1", 12, "Lions", "Bears"),
            scheduled_game("g2", 12, "Packers", "Vikings"),
        ],
    );

    let mut ledger = Ledger::new(10_000);
    let games = feed.fetch_week(12).await.unwrap();
    let a = ledger.place(&games[0], "Lions", 500).unwrap();
    let b = ledger.place(&games[1], "Packers", 300).unwrap();

    ledger.edit(a, Some(800), Some("Bears"), &games).unwrap();
    ledger.cancel(b, &games).unwrap();
    assert_eq!(ledger.balance(), 10_000 - 800);
    assert_eq!(ledger.history().len(), 1);

    // Kickoff: g1 goes final, edits must now be rejected.
    feed.set_week(12, vec![final_game("g1", 12, "Lions", 17, "Bears", 27)]);
    let games = feed.fetch_week(12).await.unwrap();
    assert!(ledger.edit(a, Some(100), None, &games).is_err());
    assert!(ledger.cancel(a, &games).is_err());

    ledger.settle(&games);
    let wager = ledger.find(a).unwrap();
    assert_eq!(wager.outcome, WagerOutcome::Won); // edited pick was Bears
    assert_eq!(ledger.balance(), 10_000 - 800 + 1_600);
}

#[tokio::test]
async fn free_trivia_session_from_feed_games() {
    let feed = MockFeed::new(13);
    feed.set_week(
        13,
        vec![
            final_game("g1", 12, "Lions", 24, "Bears", 20),
            final_game("g2", 12, "Packers", 31, "Vikings", 10),
            scheduled_game("g3", 13, "Eagles", "Cowboys"),
        ],
    );

    let mut ledger = Ledger::new(10_000);
    let mut engine = TriviaEngine::new(TriviaConfig::default());
    let mut rng = StdRng::seed_from_u64(1);
    let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
    let games = feed.fetch_week(13).await.unwrap();

    engine.start_free(today, &games, &mut rng).unwrap();
    assert!(engine.is_active());

    // Run to completion answering correctly via the question key.
    let mut answered = 0;
    while engine.is_active() {
        let key = engine.current_question().unwrap().key.clone();
        let outcome = match key {
            AnswerKey::Bool(expected) => engine.answer_bool(expected, &mut ledger),
            AnswerKey::Choice { correct, .. } => engine.answer_choice(correct, &mut ledger),
            AnswerKey::Numeric { expected, .. } => engine.answer_numeric(expected, &mut ledger),
        }
        .unwrap();
        answered += 1;
        assert!(outcome.correct);
        if !outcome.session_over {
            engine.proceed(&games, &mut rng).unwrap();
        }
    }

    assert_eq!(answered, 5);
    assert!(ledger.balance() >= 10_000 + 5 * 100); // smallest reward is 100
    assert_eq!(engine.last_free_play(), Some(today));
    assert!(!engine.can_play_free(today));
    assert!(engine.can_play_free(today.succ_opt().unwrap()));
}

#[tokio::test]
async fn paid_trivia_session_charges_and_penalizes() {
    let feed = MockFeed::new(12);
    feed.set_week(12, vec![final_game("g1", 12, "Lions", 24, "Bears", 20)]);

    let mut ledger = Ledger::new(1_000);
    let mut engine = TriviaEngine::new(TriviaConfig::default());
    let mut rng = StdRng::seed_from_u64(9);
    let games = feed.fetch_week(12).await.unwrap();

    engine.start_paid(&mut ledger, &games, &mut rng).unwrap();
    assert_eq!(ledger.balance(), 750);

    // Miss three times; every penalty is a quarter-step in [50, 200]
    // and the balance never goes negative.
    while engine.is_active() {
        let key = engine.current_question().unwrap().key.clone();
        let outcome = match key {
            AnswerKey::Bool(expected) => engine.answer_bool(!expected, &mut ledger),
            AnswerKey::Choice { labels, correct } => {
                engine.answer_choice((correct + 1) % labels.len(), &mut ledger)
            }
            AnswerKey::Numeric { expected, tolerance } => {
                engine.answer_numeric(expected + tolerance + 1, &mut ledger)
            }
        }
        .unwrap();
        assert!(!outcome.correct);
        assert!(outcome.penalty >= 50 && outcome.penalty <= 200);
        assert_eq!(outcome.penalty % 25, 0);
        if !outcome.session_over {
            engine.proceed(&games, &mut rng).unwrap();
        }
    }

    assert!(ledger.balance() <= 750);
    // Paid runs never consume the free-play day.
    assert!(engine.last_free_play().is_none());
}

#[tokio::test]
async fn state_survives_a_save_load_cycle() {
    let path = temp_path();
    let feed = MockFeed::new(12);
    feed.set_week(12, vec![scheduled_game("gameA", 12, "Lions", "Bears")]);

    // Session one: place a wager and persist.
    {
        let mut ledger = Ledger::new(10_000);
        let games = feed.fetch_week(12).await.unwrap();
        ledger.place(&games[0], "Lions", 500).unwrap();

        let state = PlayerState {
            balance: ledger.balance(),
            wagers: ledger.history().to_vec(),
            favorite_team: Some("Lions".to_string()),
            last_free_play: NaiveDate::from_ymd_opt(2026, 8, 28),
            session_active: false,
        };
        storage::save_state(&state, Some(&path)).unwrap();
    }

    // Session two: restore and settle against fresh feed data.
    let state = storage::load_state(Some(&path)).unwrap().unwrap();
    assert_eq!(state.balance, 9_500);
    assert_eq!(state.favorite_team.as_deref(), Some("Lions"));

    let mut ledger = Ledger::from_parts(state.balance, state.wagers);
    let engine = TriviaEngine::restore(TriviaConfig::default(), state.last_free_play);
    assert!(engine.can_play_free(NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()));

    feed.set_week(12, vec![final_game("gameA", 12, "Lions", 20, "Bears", 20)]);
    let games = feed.fetch_week(12).await.unwrap();
    ledger.settle(&games);

    // Tie: push refunds the stake, balance back where it started.
    assert_eq!(ledger.balance(), 10_000);
    assert_eq!(ledger.history()[0].payout, 500);

    storage::delete_state(Some(&path)).unwrap();
}

#[tokio::test]
async fn feed_errors_leave_the_ledger_untouched() {
    let feed = MockFeed::new(12);
    feed.set_week(12, vec![scheduled_game("gameA", 12, "Lions", "Bears")]);

    let mut ledger = Ledger::new(10_000);
    let games = feed.fetch_week(12).await.unwrap();
    ledger.place(&games[0], "Lions", 500).unwrap();

    feed.set_error("scoreboard unavailable");
    assert!(feed.fetch_week(12).await.is_err());
    assert!(feed.current_week().await.is_err());

    // Nothing settled, wager stays pending until the feed recovers.
    assert_eq!(ledger.balance(), 9_500);
    assert!(ledger.history()[0].is_pending());
}
