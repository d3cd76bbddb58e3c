// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! scorekeeper-kernel: score submission and leaderboard maintenance for the typing game.
//!
//! The kernel owns the data contracts, the validation rules, the store traits and the
//! three engines built on top of them (leaderboard maintainer, ranking view builder,
//! submission orchestrator). Backends live in `scorekeeper-persistence`; the HTTP
//! surface lives in `scorekeeper-node`.

pub mod config;
pub mod error;
pub mod types;
pub mod validate;
pub mod storage;
pub mod leaderboard;
pub mod ranking;
pub mod submission;
pub mod catalog;

#[cfg(test)]
pub mod tests;

pub use error::{StoreError, SubmissionError, ValidationError};
pub use leaderboard::{LeaderboardMaintainer, UpdateProtocol};
pub use ranking::RankingViewBuilder;
pub use submission::{SubmissionOrchestrator, SubmissionReceipt};
pub use types::{LeaderboardEntry, RankedEntry, RankedView, ScoreEvent, ScoreSubmission, UpdateOutcome, ValidScore};
