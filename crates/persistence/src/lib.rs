// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! File-backed stores for scorekeeper.
//!
//! - `ledger`: append-only score ledger (framed, checksummed, fsync'd)
//! - `table`: leaderboard table file (hashed snapshot, atomic replace)
//! - `catalog`: read-only word and translation tables (JSON)

pub mod error;
pub mod ledger;
pub mod table;
pub mod catalog;

pub use error::{PersistenceError, Result};
pub use ledger::{FileLedger, LedgerReader};
pub use table::FileLeaderboard;
pub use catalog::{JsonTranslations, JsonWordCatalog};
