// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use crate::config::DEFAULT_SCAN_PAGE;
use crate::error::{StoreError, StoreResult};
use crate::storage::{ConditionalPut, LeaderboardStore, ScanPage, ScoreLedger};
use crate::types::{LeaderboardEntry, ScoreEvent};

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

/// In-process ledger. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryLedger {
    events: RwLock<Vec<ScoreEvent>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every appended event, in append order.
    pub fn events(&self) -> Vec<ScoreEvent> {
        self.events.read().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreLedger for MemoryLedger {
    fn append(&self, event: &ScoreEvent) -> StoreResult<()> {
        let mut guard = self.events.write().map_err(|_| poisoned())?;
        guard.push(event.clone());
        Ok(())
    }
}

/// In-process leaderboard keyed by player name.
///
/// `max_page` caps every scan page regardless of the requested limit, the way a
/// hosted key-value store paginates internally.
pub struct MemoryLeaderboard {
    entries: RwLock<BTreeMap<String, LeaderboardEntry>>,
    max_page: usize,
}

impl Default for MemoryLeaderboard {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_SCAN_PAGE)
    }
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(max_page: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            max_page: max_page.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LeaderboardStore for MemoryLeaderboard {
    fn get(&self, player_name: &str) -> StoreResult<Option<LeaderboardEntry>> {
        let guard = self.entries.read().map_err(|_| poisoned())?;
        Ok(guard.get(player_name).cloned())
    }

    fn put(&self, entry: &LeaderboardEntry) -> StoreResult<()> {
        let mut guard = self.entries.write().map_err(|_| poisoned())?;
        guard.insert(entry.player_name.clone(), entry.clone());
        Ok(())
    }

    fn put_if_higher(&self, entry: &LeaderboardEntry) -> StoreResult<ConditionalPut> {
        let mut guard = self.entries.write().map_err(|_| poisoned())?;
        let previous = guard.get(&entry.player_name).map(|e| e.score);
        match previous {
            Some(current) if current >= entry.score => Ok(ConditionalPut::Rejected { current }),
            _ => {
                guard.insert(entry.player_name.clone(), entry.clone());
                Ok(ConditionalPut::Applied { previous })
            }
        }
    }

    fn scan(&self, start_after: Option<&str>, limit: usize) -> StoreResult<ScanPage> {
        let guard = self.entries.read().map_err(|_| poisoned())?;
        let limit = limit.clamp(1, self.max_page);

        let lower = match start_after {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };

        let mut entries: Vec<LeaderboardEntry> = guard
            .range::<str, _>((lower, Bound::Unbounded))
            .map(|(_, e)| e.clone())
            .take(limit + 1)
            .collect();

        let next = if entries.len() > limit {
            entries.truncate(limit);
            entries.last().map(|e| e.player_name.clone())
        } else {
            None
        };

        Ok(ScanPage { entries, next })
    }
}
