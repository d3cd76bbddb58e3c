// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Submission orchestrator.
//!
//! `received -> validated -> ledger-written -> leaderboard-considered -> responded`
//!
//! - A validation failure responds immediately; the ledger is not touched.
//! - A ledger failure is fatal; no leaderboard update happens without a ledger record.
//! - A leaderboard failure is logged and carried in the receipt; the submission
//!   still succeeds.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SubmissionError;
use crate::leaderboard::LeaderboardMaintainer;
use crate::storage::ScoreLedger;
use crate::types::{ScoreEvent, ScoreSubmission, UpdateOutcome};
use crate::validate::validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    LedgerWritten,
    LeaderboardConsidered,
    Responded,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::LedgerWritten => "ledger-written",
            Stage::LeaderboardConsidered => "leaderboard-considered",
            Stage::Responded => "responded",
        }
    }
}

/// Successful submission: the normalized event that was recorded and what happened
/// to the leaderboard.
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub event: ScoreEvent,
    pub leaderboard: UpdateOutcome,
}

pub struct SubmissionOrchestrator {
    ledger: Arc<dyn ScoreLedger>,
    maintainer: LeaderboardMaintainer,
}

impl SubmissionOrchestrator {
    pub fn new(ledger: Arc<dyn ScoreLedger>, maintainer: LeaderboardMaintainer) -> Self {
        Self { ledger, maintainer }
    }

    pub fn maintainer(&self) -> &LeaderboardMaintainer {
        &self.maintainer
    }

    pub fn submit(&self, submission: &ScoreSubmission) -> Result<SubmissionReceipt, SubmissionError> {
        self.submit_at(submission, unix_now())
    }

    /// Same as [`submit`](Self::submit) with an explicit server timestamp.
    pub fn submit_at(
        &self,
        submission: &ScoreSubmission,
        timestamp: u64,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        tracing::debug!(stage = Stage::Received.as_str(), player = %submission.player_name);

        let valid = validate(submission).map_err(|e| {
            tracing::info!(
                stage = Stage::Responded.as_str(),
                player = %submission.player_name,
                chars = submission.player_name.chars().count(),
                bytes = submission.player_name.len(),
                "submission rejected: {}", e
            );
            e
        })?;
        tracing::debug!(stage = Stage::Validated.as_str(), player = %valid.player_name);

        let event = ScoreEvent::new(valid, timestamp);
        if let Err(e) = self.ledger.append(&event) {
            tracing::error!(
                stage = Stage::Responded.as_str(),
                player = %event.player_name,
                error = %e,
                "failed to save score"
            );
            return Err(SubmissionError::Ledger(e));
        }
        tracing::debug!(stage = Stage::LedgerWritten.as_str(), player = %event.player_name, score = event.score);

        let leaderboard = self.maintainer.consider_update(
            &event.player_name,
            event.score,
            event.round,
            event.category.as_deref(),
        );
        match &leaderboard {
            UpdateOutcome::Failed(e) => tracing::warn!(
                stage = Stage::LeaderboardConsidered.as_str(),
                player = %event.player_name,
                error = %e,
                "failed to update leaderboard, continuing"
            ),
            outcome => tracing::debug!(
                stage = Stage::LeaderboardConsidered.as_str(),
                player = %event.player_name,
                outcome = outcome.label()
            ),
        }

        tracing::info!(
            stage = Stage::Responded.as_str(),
            player = %event.player_name,
            score = event.score,
            round = event.round,
            "score submitted"
        );
        Ok(SubmissionReceipt { event, leaderboard })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
