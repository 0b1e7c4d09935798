//! Game feed collaborator boundary.
//!
//! Defines the `GameFeed` trait the core consumes. The core never
//! fetches anything itself; it receives already-materialized game
//! snapshots with statuses normalized into scheduled/live/final.

pub mod espn;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Game;

/// Abstraction over a schedule/score provider.
#[async_trait]
pub trait GameFeed: Send + Sync {
    /// All games for the given week.
    async fn fetch_week(&self, week: u32) -> Result<Vec<Game>>;

    /// The week the season is currently in.
    async fn current_week(&self) -> Result<u32>;
}
