// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Minimum player name length, in Unicode scalar values.
pub const MIN_NAME_CHARS: usize = 1;

/// Maximum player name length, in Unicode scalar values.
pub const MAX_NAME_CHARS: usize = 20;

/// Highest score a single round can report.
pub const MAX_SCORE: i64 = 1_000_000;

pub const MIN_ROUND: i64 = 1;
pub const MAX_ROUND: i64 = 5;

/// Longest accepted elapsed time, in seconds (one hour).
pub const MAX_TIME_SECS: i64 = 3_600;

/// Size of the ranked view served by the leaderboard endpoint.
pub const LEADERBOARD_SIZE: usize = 30;

/// Default page size used when scanning a leaderboard store.
pub const DEFAULT_SCAN_PAGE: usize = 100;
