//! Wagering ledger — coin balance and the full wager history.
//!
//! Owns every balance mutation in the system. All operations are
//! synchronous, single-writer rejections-not-panics: a failed
//! precondition returns a named `PickemError` and leaves state
//! untouched. Settlement reconciles pending wagers against a feed
//! snapshot and is safe to call repeatedly.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{Game, PickemError, Wager, WagerOutcome};

pub struct Ledger {
    balance: u64,
    wagers: Vec<Wager>,
}

impl Ledger {
    /// Fresh ledger with the starting bankroll.
    pub fn new(initial_bankroll: u64) -> Self {
        Self {
            balance: initial_bankroll,
            wagers: Vec::new(),
        }
    }

    /// Rebuild a ledger from persisted state.
    pub fn from_parts(balance: u64, wagers: Vec<Wager>) -> Self {
        Self { balance, wagers }
    }

    // -- Query surface ---------------------------------------------------

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// All wagers ever placed, in insertion order.
    pub fn history(&self) -> &[Wager] {
        &self.wagers
    }

    pub fn find(&self, id: Uuid) -> Option<&Wager> {
        self.wagers.iter().find(|w| w.id == id)
    }

    pub fn wins(&self) -> usize {
        self.wagers
            .iter()
            .filter(|w| w.outcome == WagerOutcome::Won)
            .count()
    }

    pub fn losses(&self) -> usize {
        self.wagers
            .iter()
            .filter(|w| w.outcome == WagerOutcome::Lost)
            .count()
    }

    /// Wins over terminal wagers, 0.0 when nothing has settled yet.
    pub fn win_rate(&self) -> f64 {
        let wins = self.wins();
        let terminal = wins + self.losses();
        if terminal == 0 {
            0.0
        } else {
            wins as f64 / terminal as f64
        }
    }

    /// Total stake still locked in pending wagers.
    pub fn pending_stake(&self) -> u64 {
        self.wagers
            .iter()
            .filter(|w| w.is_pending())
            .map(|w| w.stake)
            .sum()
    }

    // -- Coin movements (used by the trivia engine) ----------------------

    /// Unconditional credit.
    pub fn credit(&mut self, amount: u64) {
        self.balance += amount;
    }

    /// Debit with an affordability check.
    pub fn debit(&mut self, amount: u64) -> Result<(), PickemError> {
        if self.balance < amount {
            return Err(PickemError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Debit as much of `amount` as the balance covers. Returns the
    /// amount actually deducted.
    pub fn debit_saturating(&mut self, amount: u64) -> u64 {
        let deducted = amount.min(self.balance);
        self.balance -= deducted;
        deducted
    }

    // -- Operations ------------------------------------------------------

    /// Place a wager on a scheduled game. Debits the stake and appends
    /// a pending wager with the game fields copied at placement time.
    pub fn place(
        &mut self,
        game: &Game,
        picked_team: &str,
        stake: u64,
    ) -> Result<Uuid, PickemError> {
        if stake == 0 {
            return Err(PickemError::InvalidStake);
        }
        if !game.is_wagerable() {
            return Err(PickemError::GameNotWagerable(game.id.clone()));
        }
        if self.balance < stake {
            return Err(PickemError::InsufficientFunds {
                needed: stake,
                available: self.balance,
            });
        }

        self.balance -= stake;

        let wager = Wager {
            id: Uuid::new_v4(),
            game_id: game.id.clone(),
            week: game.week,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            picked_team: picked_team.to_string(),
            stake,
            outcome: WagerOutcome::Pending,
            payout: 0,
            placed_at: Utc::now(),
        };
        let id = wager.id;

        info!(
            wager = %id,
            game = %game.id,
            pick = picked_team,
            stake,
            balance = self.balance,
            "Wager placed"
        );

        self.wagers.push(wager);
        Ok(id)
    }

    /// Edit a pending wager while its game is still scheduled. Stake and
    /// pick may change independently or together; a stake change that
    /// would be unaffordable rejects the whole edit with no partial
    /// state visible to the caller.
    pub fn edit(
        &mut self,
        id: Uuid,
        new_stake: Option<u64>,
        new_pick: Option<&str>,
        games: &[Game],
    ) -> Result<(), PickemError> {
        let idx = self
            .wagers
            .iter()
            .position(|w| w.id == id)
            .ok_or(PickemError::WagerNotFound(id))?;

        if !self.wagers[idx].is_pending() {
            return Err(PickemError::GameNotWagerable(
                self.wagers[idx].game_id.clone(),
            ));
        }
        let game = games
            .iter()
            .find(|g| g.id == self.wagers[idx].game_id)
            .filter(|g| g.is_wagerable())
            .ok_or_else(|| {
                PickemError::GameNotWagerable(self.wagers[idx].game_id.clone())
            })?;

        // Validate the stake change fully before mutating anything.
        if let Some(stake) = new_stake {
            if stake == 0 {
                return Err(PickemError::InvalidStake);
            }
            let available = self.balance + self.wagers[idx].stake;
            if available < stake {
                return Err(PickemError::InsufficientFunds {
                    needed: stake,
                    available,
                });
            }
            self.balance = available - stake;
            self.wagers[idx].stake = stake;
        }

        if let Some(pick) = new_pick {
            self.wagers[idx].picked_team = pick.to_string();
        }

        info!(
            wager = %id,
            game = %game.id,
            stake = self.wagers[idx].stake,
            pick = %self.wagers[idx].picked_team,
            balance = self.balance,
            "Wager edited"
        );
        Ok(())
    }

    /// Cancel a pending wager while its game is still scheduled.
    /// Refunds the stake and removes the wager from history entirely.
    /// Returns the refunded amount.
    pub fn cancel(&mut self, id: Uuid, games: &[Game]) -> Result<u64, PickemError> {
        let idx = self
            .wagers
            .iter()
            .position(|w| w.id == id)
            .ok_or(PickemError::WagerNotFound(id))?;

        if !self.wagers[idx].is_pending() {
            return Err(PickemError::GameNotWagerable(
                self.wagers[idx].game_id.clone(),
            ));
        }
        let wagerable = games
            .iter()
            .any(|g| g.id == self.wagers[idx].game_id && g.is_wagerable());
        if !wagerable {
            return Err(PickemError::GameNotWagerable(
                self.wagers[idx].game_id.clone(),
            ));
        }

        let wager = self.wagers.remove(idx);
        self.balance += wager.stake;

        info!(
            wager = %id,
            game = %wager.game_id,
            refund = wager.stake,
            balance = self.balance,
            "Wager cancelled"
        );
        Ok(wager.stake)
    }

    /// Settle every pending wager whose game the snapshot reports as
    /// final with both scores. Ties push (refund the stake, outcome
    /// Won); a decisive result pays 2x the stake on a correct pick.
    /// Wagers whose game is missing, still running, or score-less are
    /// left pending, so repeated calls with partial feeds are safe.
    pub fn settle(&mut self, games: &[Game]) -> Vec<Uuid> {
        let mut settled = Vec::new();

        for wager in &mut self.wagers {
            if !wager.is_pending() {
                continue;
            }
            let Some(game) = games.iter().find(|g| g.id == wager.game_id) else {
                continue;
            };
            let Some((home_score, away_score)) = game.final_scores() else {
                debug!(wager = %wager.id, game = %game.id, "Not yet settleable");
                continue;
            };

            if home_score == away_score {
                // Push: stake back, no profit either way.
                self.balance += wager.stake;
                wager.outcome = WagerOutcome::Won;
                wager.payout = wager.stake;
            } else {
                let winner = if home_score > away_score {
                    &game.home_team
                } else {
                    &game.away_team
                };
                if wager.picked_team == *winner {
                    let payout = wager.stake * 2;
                    self.balance += payout;
                    wager.outcome = WagerOutcome::Won;
                    wager.payout = payout;
                } else {
                    wager.outcome = WagerOutcome::Lost;
                    wager.payout = 0;
                }
            }

            info!(
                wager = %wager.id,
                game = %game.id,
                outcome = %wager.outcome,
                payout = wager.payout,
                balance = self.balance,
                "Wager settled"
            );
            settled.push(wager.id);
        }

        settled
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
