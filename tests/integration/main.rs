//! Integration test harness.

mod mock_feed;
mod simulation;
