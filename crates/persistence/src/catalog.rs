// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Read-only word and translation tables.
//!
//! Each table is a JSON array on disk, loaded once at startup. A missing file is an empty
//! table; a malformed file is a startup error.

use std::collections::HashMap;
use std::path::Path;

use scorekeeper_kernel::catalog::{TranslationItem, TranslationLookup, TranslationQuery, WordCatalog, WordItem, WordQuery};
use scorekeeper_kernel::error::StoreResult;
use serde::de::DeserializeOwned;

use crate::error::Result;

fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "catalog table not found, serving it empty");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

pub struct JsonWordCatalog {
    items: Vec<WordItem>,
}

impl JsonWordCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let items: Vec<WordItem> = load_rows(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), words = items.len(), "word catalog loaded");
        Ok(Self { items })
    }

    pub fn from_items(items: Vec<WordItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl WordCatalog for JsonWordCatalog {
    fn words(&self, query: &WordQuery) -> StoreResult<Vec<WordItem>> {
        Ok(self.items.iter().filter(|w| query.matches(w)).cloned().collect())
    }
}

pub struct JsonTranslations {
    by_key: HashMap<(String, String), String>,
}

impl JsonTranslations {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let rows: Vec<TranslationItem> = load_rows(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), translations = rows.len(), "translations loaded");
        Ok(Self::from_items(rows))
    }

    /// Later rows win when the same `(word_id, language)` pair appears twice.
    pub fn from_items(rows: Vec<TranslationItem>) -> Self {
        let by_key = rows
            .into_iter()
            .map(|t| ((t.word_id, t.language), t.translation))
            .collect();
        Self { by_key }
    }
}

impl TranslationLookup for JsonTranslations {
    fn translation(&self, query: &TranslationQuery) -> StoreResult<Option<String>> {
        Ok(self
            .by_key
            .get(&(query.word_id.clone(), query.language.clone()))
            .cloned())
    }
}
