//! PICKEM — virtual-coin sports wagering ledger and trivia engine.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores player state from disk (or creates fresh), and runs a
//! fetch→settle→persist loop with graceful shutdown. Trivia sessions
//! are driven by the presentation layer; this binary keeps the ledger
//! reconciled against the live feed.

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};

use pickem::config::AppConfig;
use pickem::feed::espn::EspnFeed;
use pickem::feed::GameFeed;
use pickem::ledger::Ledger;
use pickem::storage;
use pickem::types::PlayerState;

const BANNER: &str = r#"
 ____ ___ ____ _  _ _____ __  __
|  _ \_ _/ ___| |/ /| ____|  \/  |
| |_) | | |   | ' / |  _| | |\/| |
|  __/| | |___| . \ | |___| |  | |
|_|  |___\____|_|\_\|_____|_|  |_|

  Pick winners. Earn coins. Settle up.
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_or_default("config.toml")?;
    init_logging();

    println!("{BANNER}");
    info!(
        name = %cfg.app.name,
        settle_interval_secs = cfg.app.settle_interval_secs,
        initial_bankroll = cfg.ledger.initial_bankroll,
        "PICKEM starting up"
    );

    // -- Restore or create state -----------------------------------------

    let state_file = cfg.app.state_file.clone();
    let mut state = match storage::load_state(state_file.as_deref())? {
        Some(s) => {
            info!(balance = s.balance, wagers = s.wagers.len(), "Resumed from saved state");
            s
        }
        None => {
            let s = PlayerState::new(cfg.ledger.initial_bankroll);
            info!(balance = s.balance, "Fresh start");
            s
        }
    };

    let mut ledger = Ledger::from_parts(state.balance, std::mem::take(&mut state.wagers));
    let feed = EspnFeed::new(cfg.feed.base_url.clone())?;

    // -- Main loop -------------------------------------------------------

    let interval = Duration::from_secs(cfg.app.settle_interval_secs);
    let mut ticker = tokio::time::interval(interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.app.settle_interval_secs,
        "Entering settle loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_settle_pass(&feed, &mut ledger).await {
                    Ok(settled) => {
                        info!(
                            settled,
                            wins = ledger.wins(),
                            losses = ledger.losses(),
                            win_rate = format!("{:.1}%", ledger.win_rate() * 100.0),
                            balance = ledger.balance(),
                            "Settle pass complete"
                        );
                        if let Err(e) = persist(&ledger, &state, state_file.as_deref()) {
                            error!(error = %e, "Failed to save state");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Settle pass failed, retrying next tick");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    persist(&ledger, &state, state_file.as_deref())?;
    info!(
        balance = ledger.balance(),
        wagers = ledger.history().len(),
        "PICKEM shut down cleanly."
    );

    Ok(())
}

/// Fetch the current week and settle whatever is final.
async fn run_settle_pass(feed: &impl GameFeed, ledger: &mut Ledger) -> Result<usize> {
    let week = feed.current_week().await?;
    let games = feed.fetch_week(week).await?;
    info!(week, games = games.len(), "Fetched schedule");

    let settled = ledger.settle(&games);
    Ok(settled.len())
}

/// Write the current ledger back into the persisted blob.
fn persist(ledger: &Ledger, carried: &PlayerState, path: Option<&str>) -> Result<()> {
    let state = PlayerState {
        balance: ledger.balance(),
        wagers: ledger.history().to_vec(),
        favorite_team: carried.favorite_team.clone(),
        last_free_play: carried.last_free_play,
        session_active: carried.session_active,
    };
    storage::save_state(&state, path)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pickem=info"));

    if std::env::var("PICKEM_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
