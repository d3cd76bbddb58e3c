// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Ranking view builder.
//!
//! Scans the whole leaderboard store (following continuation keys), sorts by score
//! descending with player name ascending as the tie-break, assigns position ranks and
//! truncates. The scan has no snapshot isolation: concurrent writes may or may not show
//! up, but a scan that cannot complete fails the build instead of yielding a partial
//! ranking.

use std::cmp::Reverse;
use std::sync::Arc;

use crate::config::DEFAULT_SCAN_PAGE;
use crate::error::{StoreError, StoreResult};
use crate::storage::LeaderboardStore;
use crate::types::{LeaderboardEntry, RankedEntry, RankedView};

pub struct RankingViewBuilder {
    store: Arc<dyn LeaderboardStore>,
    page_size: usize,
}

impl RankingViewBuilder {
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        Self::with_page_size(store, DEFAULT_SCAN_PAGE)
    }

    pub fn with_page_size(store: Arc<dyn LeaderboardStore>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Top `n` entries with ranks `1..=n`.
    pub fn build_top_n(&self, n: usize) -> StoreResult<RankedView> {
        let mut entries = self.scan_all()?;
        rank_entries(&mut entries);

        let ranked = entries
            .into_iter()
            .take(n)
            .enumerate()
            .map(|(i, entry)| RankedEntry {
                rank: (i + 1) as u32,
                entry,
            })
            .collect();

        Ok(RankedView { entries: ranked })
    }

    fn scan_all(&self) -> StoreResult<Vec<LeaderboardEntry>> {
        let mut all = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.store.scan(cursor.as_deref(), self.page_size)?;
            pages += 1;
            all.extend(page.entries);

            match page.next {
                None => break,
                Some(next) => {
                    // A continuation key must move forward or the scan never ends.
                    if cursor.as_deref().is_some_and(|prev| next.as_str() <= prev) {
                        return Err(StoreError::IncompleteScan(format!(
                            "continuation key did not advance past {:?} after {} pages",
                            next, pages
                        )));
                    }
                    cursor = Some(next);
                }
            }
        }

        tracing::debug!(pages, players = all.len(), "leaderboard scan complete");
        Ok(all)
    }
}

/// Stable sort: score descending, then player name ascending.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        Reverse(a.score)
            .cmp(&Reverse(b.score))
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
}
