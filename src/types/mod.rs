// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Data contracts shared by the engines and the backends.

pub mod score;
pub mod entry;

pub use score::{ScoreEvent, ScoreSubmission, ValidScore};
pub use entry::{LeaderboardEntry, RankedEntry, RankedView, UpdateOutcome};
