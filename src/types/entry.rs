// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::score::ScoreEvent;

/// A player's best known result. One per player name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    pub round: u8,
    pub category: Option<String>,
}

impl From<&ScoreEvent> for LeaderboardEntry {
    fn from(event: &ScoreEvent) -> Self {
        Self {
            player_name: event.player_name.clone(),
            score: event.score,
            round: event.round,
            category: event.category.clone(),
        }
    }
}

/// A leaderboard entry annotated with its position rank (1-based).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Ordered, rank-annotated, size-bounded projection of the leaderboard store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedView {
    pub entries: Vec<RankedEntry>,
}

impl RankedView {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter()
    }
}

/// Result of considering one candidate score for the leaderboard.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The candidate became the player's best. `previous` is the score it replaced.
    Updated { previous: Option<u32> },
    /// The stored best is greater than or equal to the candidate.
    Skipped { best: u32 },
    /// The store failed. Never fatal to a submission.
    Failed(StoreError),
}

impl UpdateOutcome {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            UpdateOutcome::Updated { .. } => "updated",
            UpdateOutcome::Skipped { .. } => "skipped",
            UpdateOutcome::Failed(_) => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UpdateOutcome::Failed(_))
    }
}
