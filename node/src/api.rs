// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Request and response bodies of the HTTP surface.

use scorekeeper_kernel::catalog::{CategoryInfo, WordItem};
use scorekeeper_kernel::types::{RankedEntry, ScoreEvent};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Typing Game API is running".to_string(),
        }
    }
}

/// Echo of the normalized submission.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ScoreData {
    pub player_name: String,
    pub score: u32,
    pub round: u8,
    pub time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub timestamp: u64,
}

impl From<ScoreEvent> for ScoreData {
    fn from(event: ScoreEvent) -> Self {
        Self {
            player_name: event.player_name,
            score: event.score,
            round: event.round,
            time: event.time,
            category: event.category,
            timestamp: event.timestamp,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitScoreResponse {
    pub message: String,
    pub data: ScoreData,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub player_name: String,
    pub score: u32,
    pub round: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub rank: u32,
}

impl From<RankedEntry> for LeaderboardRow {
    fn from(ranked: RankedEntry) -> Self {
        Self {
            player_name: ranked.entry.player_name,
            score: ranked.entry.score,
            round: ranked.entry.round,
            category: ranked.entry.category,
            rank: ranked.rank,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardRow>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WordsResponse {
    pub words: Vec<WordItem>,
    pub category: String,
    pub round: u8,
    pub language: String,
}

#[derive(Serialize, Debug)]
pub struct CategoriesResponse {
    pub categories: &'static [CategoryInfo],
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TranslationResponse {
    pub translation: String,
    pub word_id: String,
    pub language: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct LanguageParams {
    pub language: Option<String>,
}
