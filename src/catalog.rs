// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Word catalog and translation lookup contracts.
//!
//! Both are read-only collaborators: the service queries them per request and never
//! writes to them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{MAX_ROUND, MIN_ROUND};
use crate::error::StoreResult;

pub const CATEGORIES: [&str; 4] = [
    "beginner_words",
    "intermediate_words",
    "beginner_conversation",
    "intermediate_conversation",
];

/// Languages a word list can be requested in.
pub const WORD_LANGUAGES: [&str; 2] = ["jp", "en"];

/// Languages a single translation can be requested in.
pub const TRANSLATION_LANGUAGES: [&str; 7] = ["jp", "en", "es", "fr", "de", "zh", "ko"];

pub const DEFAULT_LANGUAGE: &str = "jp";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogQueryError {
    #[error("Invalid category parameter")]
    InvalidCategory,
    #[error("Invalid round parameter")]
    InvalidRound,
    #[error("Invalid language parameter")]
    InvalidLanguage,
    #[error("word_id parameter is required")]
    MissingWordId,
    #[error("language query parameter is required")]
    MissingLanguage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordKind {
    #[default]
    Normal,
    Bonus,
    Debuff,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    pub category: String,
    pub word_id: String,
    pub word: String,
    pub round: u8,
    #[serde(rename = "type", default)]
    pub kind: WordKind,
    pub language: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationItem {
    pub word_id: String,
    pub language: String,
    pub translation: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// A validated `category x round x language` partition of the word catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordQuery {
    pub category: String,
    pub round: u8,
    pub language: String,
}

impl WordQuery {
    /// `round` arrives as a raw path segment; `language` defaults to Japanese.
    pub fn parse(category: &str, round: &str, language: Option<&str>) -> Result<Self, CatalogQueryError> {
        if !CATEGORIES.contains(&category) {
            return Err(CatalogQueryError::InvalidCategory);
        }

        let language = language.unwrap_or(DEFAULT_LANGUAGE);
        if !WORD_LANGUAGES.contains(&language) {
            return Err(CatalogQueryError::InvalidLanguage);
        }

        let round: i64 = round.parse().map_err(|_| CatalogQueryError::InvalidRound)?;
        if !(MIN_ROUND..=MAX_ROUND).contains(&round) {
            return Err(CatalogQueryError::InvalidRound);
        }

        Ok(Self {
            category: category.to_owned(),
            round: round as u8,
            language: language.to_owned(),
        })
    }

    pub fn matches(&self, item: &WordItem) -> bool {
        item.category == self.category && item.round == self.round && item.language == self.language
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationQuery {
    pub word_id: String,
    pub language: String,
}

impl TranslationQuery {
    pub fn parse(word_id: &str, language: Option<&str>) -> Result<Self, CatalogQueryError> {
        if word_id.is_empty() {
            return Err(CatalogQueryError::MissingWordId);
        }
        let language = match language {
            Some(l) if !l.is_empty() => l,
            _ => return Err(CatalogQueryError::MissingLanguage),
        };
        if !TRANSLATION_LANGUAGES.contains(&language) {
            return Err(CatalogQueryError::InvalidLanguage);
        }
        Ok(Self {
            word_id: word_id.to_owned(),
            language: language.to_owned(),
        })
    }
}

pub trait WordCatalog: Send + Sync {
    fn words(&self, query: &WordQuery) -> StoreResult<Vec<WordItem>>;
}

pub trait TranslationLookup: Send + Sync {
    /// `Ok(None)` when no translation exists for the pair.
    fn translation(&self, query: &TranslationQuery) -> StoreResult<Option<String>>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

const CATEGORIES_EN: [CategoryInfo; 4] = [
    CategoryInfo {
        id: "beginner_words",
        name: "Beginner Words",
        description: "Basic words used in daily life",
        icon: "📚",
    },
    CategoryInfo {
        id: "intermediate_words",
        name: "Intermediate Words",
        description: "More complex and specialized words",
        icon: "🎓",
    },
    CategoryInfo {
        id: "beginner_conversation",
        name: "Beginner Conversation",
        description: "Short daily conversation expressions",
        icon: "💬",
    },
    CategoryInfo {
        id: "intermediate_conversation",
        name: "Intermediate Conversation",
        description: "More complex and longer conversation expressions",
        icon: "🗣️",
    },
];

const CATEGORIES_JP: [CategoryInfo; 4] = [
    CategoryInfo {
        id: "beginner_words",
        name: "初級単語",
        description: "日常生活でよく使う基本的な単語",
        icon: "📚",
    },
    CategoryInfo {
        id: "intermediate_words",
        name: "中級単語",
        description: "より複雑で専門的な単語",
        icon: "🎓",
    },
    CategoryInfo {
        id: "beginner_conversation",
        name: "初級会話",
        description: "日常的な短い会話表現",
        icon: "💬",
    },
    CategoryInfo {
        id: "intermediate_conversation",
        name: "中級会話",
        description: "より複雑で長い会話表現",
        icon: "🗣️",
    },
];

/// Category listing. Anything other than `en` gets the Japanese texts.
pub fn categories(language: Option<&str>) -> &'static [CategoryInfo] {
    match language {
        Some("en") => &CATEGORIES_EN,
        _ => &CATEGORIES_JP,
    }
}
