// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

/// A round result exactly as the client sent it.
///
/// Integer fields are wide and signed so that negative or oversized values reach the
/// validator and produce a proper validation error instead of a decode failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: i64,
    pub round: i64,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub category: Option<String>,
}

/// A submission that passed validation, normalized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidScore {
    pub player_name: String,
    pub score: u32,
    pub round: u8,
    pub time: u32,
    pub category: Option<String>,
}

/// One immutable ledger record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub player_name: String,
    pub score: u32,
    pub round: u8,
    pub time: u32,
    pub category: Option<String>,
    /// Server clock at submission, Unix seconds. Not monotonic across requests.
    pub timestamp: u64,
}

impl ScoreEvent {
    pub fn new(score: ValidScore, timestamp: u64) -> Self {
        Self {
            player_name: score.player_name,
            score: score.score,
            round: score.round,
            time: score.time,
            category: score.category,
            timestamp,
        }
    }
}
