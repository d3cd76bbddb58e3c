// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Input contract for submitted round results.
//!
//! Every rule is checked independently of the others. Name length is counted in
//! Unicode scalar values so that multi-byte names are not penalised for their
//! encoded size.

use crate::config::{MAX_NAME_CHARS, MAX_ROUND, MAX_SCORE, MAX_TIME_SECS, MIN_NAME_CHARS, MIN_ROUND};
use crate::error::ValidationError;
use crate::types::{ScoreSubmission, ValidScore};

/// All violated rules, in the fixed order name, score, round, time.
pub fn violations(submission: &ScoreSubmission) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let chars = submission.player_name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&chars) {
        errors.push(ValidationError::PlayerNameLength { chars });
    }
    if !(0..=MAX_SCORE).contains(&submission.score) {
        errors.push(ValidationError::ScoreOutOfRange(submission.score));
    }
    if !(MIN_ROUND..=MAX_ROUND).contains(&submission.round) {
        errors.push(ValidationError::RoundOutOfRange(submission.round));
    }
    if !(0..=MAX_TIME_SECS).contains(&submission.time) {
        errors.push(ValidationError::TimeOutOfRange(submission.time));
    }

    errors
}

/// Accepts and normalizes a submission, or reports the first violated rule.
pub fn validate(submission: &ScoreSubmission) -> Result<ValidScore, ValidationError> {
    if let Some(first) = violations(submission).into_iter().next() {
        return Err(first);
    }

    // Ranges were checked above, the narrowing casts cannot truncate.
    Ok(ValidScore {
        player_name: submission.player_name.clone(),
        score: submission.score as u32,
        round: submission.round as u8,
        time: submission.time as u32,
        category: normalize_category(submission.category.as_deref()),
    })
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .filter(|c| !c.trim().is_empty())
        .map(str::to_owned)
}
