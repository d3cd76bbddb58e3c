// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Leaderboard maintainer: decides whether a validated score supersedes a player's
//! recorded best.
//!
//! # Protocols
//! - [`UpdateProtocol::ReadThenWrite`]: point read, compare, unconditional put. Two
//!   concurrent submissions for the same player can both observe the stale entry and
//!   both write; the later write wins even if its score is lower. The race is accepted:
//!   this mode gives eventual, best-effort "highest score wins".
//! - [`UpdateProtocol::Conditional`]: one `put_if_higher` call, compared and written
//!   atomically by the store. No lost updates.
//!
//! Store failures are returned as [`UpdateOutcome::Failed`], never as `Err`.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::storage::{ConditionalPut, LeaderboardStore};
use crate::types::{LeaderboardEntry, UpdateOutcome};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateProtocol {
    ReadThenWrite,
    #[default]
    Conditional,
}

pub struct LeaderboardMaintainer {
    store: Arc<dyn LeaderboardStore>,
    protocol: UpdateProtocol,
}

impl LeaderboardMaintainer {
    pub fn new(store: Arc<dyn LeaderboardStore>, protocol: UpdateProtocol) -> Self {
        Self { store, protocol }
    }

    pub fn protocol(&self) -> UpdateProtocol {
        self.protocol
    }

    /// Records `score` as the player's best if it beats the stored one.
    pub fn consider_update(
        &self,
        player_name: &str,
        score: u32,
        round: u8,
        category: Option<&str>,
    ) -> UpdateOutcome {
        let candidate = LeaderboardEntry {
            player_name: player_name.to_owned(),
            score,
            round,
            category: category.map(str::to_owned),
        };

        let result = match self.protocol {
            UpdateProtocol::ReadThenWrite => self.read_then_write(&candidate),
            UpdateProtocol::Conditional => self.conditional(&candidate),
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => UpdateOutcome::Failed(e),
        }
    }

    fn read_then_write(&self, candidate: &LeaderboardEntry) -> StoreResult<UpdateOutcome> {
        let existing = self.store.get(&candidate.player_name)?;

        if let Some(best) = existing.as_ref().map(|e| e.score) {
            if best >= candidate.score {
                return Ok(UpdateOutcome::Skipped { best });
            }
        }

        // Not isolated from the read above, see module docs.
        self.store.put(candidate)?;
        Ok(UpdateOutcome::Updated {
            previous: existing.map(|e| e.score),
        })
    }

    fn conditional(&self, candidate: &LeaderboardEntry) -> StoreResult<UpdateOutcome> {
        Ok(match self.store.put_if_higher(candidate)? {
            ConditionalPut::Applied { previous } => UpdateOutcome::Updated { previous },
            ConditionalPut::Rejected { current } => UpdateOutcome::Skipped { best: current },
        })
    }
}
