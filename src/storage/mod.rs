// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Store contracts for the score ledger and the leaderboard.
//!
//! Handles are constructed once at process start and shared behind `Arc`; the engines
//! never cache store contents between calls.

pub mod memory;

pub use memory::{MemoryLeaderboard, MemoryLedger};

use crate::error::StoreResult;
use crate::types::{LeaderboardEntry, ScoreEvent};

/// Append-only record of every accepted submission.
pub trait ScoreLedger: Send + Sync {
    fn append(&self, event: &ScoreEvent) -> StoreResult<()>;
}

/// Outcome of a backend-enforced conditional write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConditionalPut {
    /// The entry was written. `previous` is the score it replaced, if any.
    Applied { previous: Option<u32> },
    /// The stored score is greater than or equal to the candidate; nothing was written.
    Rejected { current: u32 },
}

/// One page of a leaderboard scan, in player-name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanPage {
    pub entries: Vec<LeaderboardEntry>,
    /// Continuation key. `None` once the scan has reached the end of the store.
    pub next: Option<String>,
}

/// Keyed collection of each player's best result.
pub trait LeaderboardStore: Send + Sync {
    /// Point read. Absence is `Ok(None)`, not an error.
    fn get(&self, player_name: &str) -> StoreResult<Option<LeaderboardEntry>>;

    /// Unconditional replace of the entry for `entry.player_name`.
    fn put(&self, entry: &LeaderboardEntry) -> StoreResult<()>;

    /// Writes `entry` only if no entry exists or the stored score is strictly lower.
    /// The comparison and the write happen atomically inside the backend.
    fn put_if_higher(&self, entry: &LeaderboardEntry) -> StoreResult<ConditionalPut>;

    /// Returns up to `limit` entries whose player name sorts after `start_after`.
    fn scan(&self, start_after: Option<&str>, limit: usize) -> StoreResult<ScanPage>;
}
