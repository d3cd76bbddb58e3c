// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

/// A submitted field is malformed or out of range.
///
/// The display text is what clients see in the `error` field of a 400 response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Player name must be 1-20 characters")]
    PlayerNameLength { chars: usize },
    #[error("Invalid score range")]
    ScoreOutOfRange(i64),
    #[error("Invalid round")]
    RoundOutOfRange(i64),
    #[error("Invalid time")]
    TimeOutOfRange(i64),
}

/// Failure reported by a ledger, leaderboard or catalog backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("corrupted record: {0}")]
    Corrupted(String),
    /// The scan stopped before reaching the end of the collection.
    #[error("incomplete scan: {0}")]
    IncompleteScan(String),
}

/// Fatal outcome of a score submission.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Failed to save score")]
    Ledger(#[source] StoreError),
}

pub type StoreResult<T> = core::result::Result<T, StoreError>;
