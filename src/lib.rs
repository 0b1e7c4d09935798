//! PICKEM — virtual-coin sports wagering ledger and procedural trivia engine.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod feed;
pub mod ledger;
pub mod trivia;
pub mod storage;
