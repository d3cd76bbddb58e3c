// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared handler state. Store handles are opened once and shared behind `Arc`.

use std::sync::Arc;
use std::time::Duration;

use scorekeeper_kernel::catalog::{TranslationLookup, WordCatalog};
use scorekeeper_kernel::storage::{LeaderboardStore, MemoryLeaderboard, MemoryLedger, ScoreLedger};
use scorekeeper_kernel::{LeaderboardMaintainer, RankingViewBuilder, SubmissionOrchestrator};
use scorekeeper_persistence::{FileLeaderboard, FileLedger, JsonTranslations, JsonWordCatalog};

use crate::config::NodeConfig;

pub struct Stores {
    pub ledger: Arc<dyn ScoreLedger>,
    pub leaderboard: Arc<dyn LeaderboardStore>,
    pub words: Arc<dyn WordCatalog>,
    pub translations: Arc<dyn TranslationLookup>,
}

impl Stores {
    /// Opens the file-backed stores under the configured data directory.
    pub fn open(cfg: &NodeConfig) -> scorekeeper_persistence::Result<Self> {
        Ok(Self {
            ledger: Arc::new(FileLedger::open(cfg.ledger_path())?),
            leaderboard: Arc::new(FileLeaderboard::with_page_size(
                cfg.leaderboard_path(),
                cfg.scan_page_size,
            )?),
            words: Arc::new(JsonWordCatalog::load(cfg.words_path())?),
            translations: Arc::new(JsonTranslations::load(cfg.translations_path())?),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            ledger: Arc::new(MemoryLedger::new()),
            leaderboard: Arc::new(MemoryLeaderboard::new()),
            words: Arc::new(JsonWordCatalog::from_items(Vec::new())),
            translations: Arc::new(JsonTranslations::from_items(Vec::new())),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SubmissionOrchestrator>,
    pub rankings: Arc<RankingViewBuilder>,
    pub words: Arc<dyn WordCatalog>,
    pub translations: Arc<dyn TranslationLookup>,
    pub leaderboard_size: usize,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(stores: Stores, cfg: &NodeConfig) -> Self {
        let maintainer = LeaderboardMaintainer::new(stores.leaderboard.clone(), cfg.update_protocol);
        let rankings = RankingViewBuilder::with_page_size(stores.leaderboard, cfg.scan_page_size);

        Self {
            orchestrator: Arc::new(SubmissionOrchestrator::new(stores.ledger, maintainer)),
            rankings: Arc::new(rankings),
            words: stores.words,
            translations: stores.translations,
            leaderboard_size: cfg.leaderboard_size,
            request_timeout: cfg.request_timeout,
        }
    }
}
