// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Leaderboard table file.
//!
//! ```text
//! [MAGIC "SLBD"][VERSION u32][ENTRY_COUNT u64][BODY_HASH 16 bytes][BODY]
//! ```
//!
//! The body is the bincode encoding of every entry in player-name order. `BODY_HASH` is
//! the first 16 bytes of the BLAKE3 hash of the body.
//!
//! Every call reads the file from disk; nothing is cached between calls. Writers in this
//! process are serialized by a lock and replace the file through write-to-temp plus
//! rename, so readers see either the old table or the new one.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use scorekeeper_kernel::config::DEFAULT_SCAN_PAGE;
use scorekeeper_kernel::error::StoreResult;
use scorekeeper_kernel::storage::{ConditionalPut, LeaderboardStore, ScanPage};
use scorekeeper_kernel::{LeaderboardEntry, StoreError};

use crate::error::{PersistenceError, Result};

type Table = BTreeMap<String, LeaderboardEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub entry_count: u64,
    pub body_hash: [u8; 16],
}

impl TableHeader {
    pub const SIZE: usize = 4 + 4 + 8 + 16; // 32 bytes
    pub const MAGIC: [u8; 4] = *b"SLBD";
    pub const VERSION: u32 = 1;

    pub fn for_body(entry_count: u64, body: &[u8]) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            entry_count,
            body_hash: body_hash(body),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.magic);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..16].copy_from_slice(&self.entry_count.to_le_bytes());
        buf[16..32].copy_from_slice(&self.body_hash);
        buf
    }

    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(PersistenceError::Truncated);
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);
        if magic != Self::MAGIC {
            return Err(PersistenceError::InvalidMagic);
        }

        let mut word = [0u8; 4];
        word.copy_from_slice(&buf[4..8]);
        let version = u32::from_le_bytes(word);
        if version != Self::VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }

        let mut count = [0u8; 8];
        count.copy_from_slice(&buf[8..16]);
        let mut body_hash = [0u8; 16];
        body_hash.copy_from_slice(&buf[16..32]);

        Ok(Self {
            magic,
            version,
            entry_count: u64::from_le_bytes(count),
            body_hash,
        })
    }
}

fn body_hash(body: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out.copy_from_slice(&blake3::hash(body).as_bytes()[..16]);
    out
}

fn load_table(path: &Path) -> Result<Table> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Table::new()),
        Err(e) => return Err(e.into()),
    };

    let header = TableHeader::parse(&bytes)?;
    let body = &bytes[TableHeader::SIZE..];
    if body_hash(body) != header.body_hash {
        return Err(PersistenceError::InvalidFormat("leaderboard body hash mismatch".to_string()));
    }

    let (entries, _) = bincode::serde::decode_from_slice::<Vec<LeaderboardEntry>, _>(body, bincode::config::standard())
        .map_err(|e| PersistenceError::InvalidFormat(e.to_string()))?;
    if entries.len() as u64 != header.entry_count {
        return Err(PersistenceError::InvalidFormat(format!(
            "header claims {} entries, body has {}",
            header.entry_count,
            entries.len()
        )));
    }

    Ok(entries.into_iter().map(|e| (e.player_name.clone(), e)).collect())
}

fn save_table(path: &Path, table: &Table) -> Result<()> {
    let entries: Vec<&LeaderboardEntry> = table.values().collect();
    let body = bincode::serde::encode_to_vec(&entries, bincode::config::standard())
        .map_err(|e| PersistenceError::InvalidFormat(e.to_string()))?;
    let header = TableHeader::for_body(entries.len() as u64, &body);

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&header.to_bytes())?;
        file.write_all(&body)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    sync_parent_dir(path)?;
    Ok(())
}

/// Makes the rename durable.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}

/// File-backed [`LeaderboardStore`].
pub struct FileLeaderboard {
    path: PathBuf,
    page_size: usize,
    write_lock: Mutex<()>,
}

impl FileLeaderboard {
    /// Opens the table at `path`, creating an empty one if it does not exist. An existing
    /// file that fails verification is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_page_size(path, DEFAULT_SCAN_PAGE)
    }

    pub fn with_page_size(path: impl AsRef<Path>, page_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            let table = load_table(&path)?;
            tracing::info!(path = %path.display(), players = table.len(), "leaderboard table opened");
        } else {
            save_table(&path, &Table::new())?;
            tracing::info!(path = %path.display(), "leaderboard table created");
        }

        Ok(Self {
            path,
            page_size: page_size.max(1),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the table, applies `f` and saves the result if `f` reports a change.
    fn modify<T>(&self, f: impl FnOnce(&mut Table) -> (T, bool)) -> StoreResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("leaderboard lock poisoned".to_string()))?;

        let mut table = load_table(&self.path)?;
        let (out, dirty) = f(&mut table);
        if dirty {
            save_table(&self.path, &table)?;
        }
        Ok(out)
    }
}

impl LeaderboardStore for FileLeaderboard {
    fn get(&self, player_name: &str) -> StoreResult<Option<LeaderboardEntry>> {
        Ok(load_table(&self.path)?.remove(player_name))
    }

    fn put(&self, entry: &LeaderboardEntry) -> StoreResult<()> {
        self.modify(|table| {
            table.insert(entry.player_name.clone(), entry.clone());
            ((), true)
        })
    }

    fn put_if_higher(&self, entry: &LeaderboardEntry) -> StoreResult<ConditionalPut> {
        self.modify(|table| {
            let previous = table.get(&entry.player_name).map(|e| e.score);
            match previous {
                Some(current) if current >= entry.score => (ConditionalPut::Rejected { current }, false),
                _ => {
                    table.insert(entry.player_name.clone(), entry.clone());
                    (ConditionalPut::Applied { previous }, true)
                }
            }
        })
    }

    fn scan(&self, start_after: Option<&str>, limit: usize) -> StoreResult<ScanPage> {
        let table = load_table(&self.path)?;
        let limit = limit.clamp(1, self.page_size);

        let lower = match start_after {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };
        let mut entries: Vec<LeaderboardEntry> = table
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            score,
            round: 2,
            category: Some("beginner_words".to_string()),
        }
    }

    #[test]
    fn test_table_header_serialization() {
        let header = TableHeader::for_body(3, b"body");
        let decoded = TableHeader::parse(&header.to_bytes()).unwrap();
        assert_eq!(header, decoded);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = [0u8; TableHeader::SIZE];
        bytes[0..4].copy_from_slice(b"BADM");
        assert!(matches!(TableHeader::parse(&bytes), Err(PersistenceError::InvalidMagic)));
    }

    #[test]
    fn test_save_table_replaces_and_syncs_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.table");

        let mut table = Table::new();
        table.insert("Al".to_string(), entry("Al", 10));
        save_table(&path, &table).unwrap();
        table.insert("Bo".to_string(), entry("Bo", 20));
        save_table(&path, &table).unwrap();

        assert!(!path.with_extension("tmp").exists());
        assert_eq!(load_table(&path).unwrap().len(), 2);

        // A bare file name syncs the current directory.
        sync_parent_dir(Path::new("board.table")).unwrap();
    }

    #[test]
    fn test_open_creates_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.table");

        let board = FileLeaderboard::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(board.get("anyone").unwrap(), None);
        assert_eq!(board.scan(None, 10).unwrap(), ScanPage::default());
    }

    #[test]
    fn test_put_and_get_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.table");

        {
            let board = FileLeaderboard::open(&path).unwrap();
            board.put(&entry("Al", 100)).unwrap();
            board.put(&entry("さくら", 250)).unwrap();
        }

        let board = FileLeaderboard::open(&path).unwrap();
        assert_eq!(board.get("Al").unwrap(), Some(entry("Al", 100)));
        assert_eq!(board.get("さくら").unwrap().unwrap().score, 250);
    }

    #[test]
    fn test_put_if_higher_on_disk() {
        let dir = tempdir().unwrap();
        let board = FileLeaderboard::open(dir.path().join("board.table")).unwrap();

        assert_eq!(
            board.put_if_higher(&entry("Al", 100)).unwrap(),
            ConditionalPut::Applied { previous: None }
        );
        assert_eq!(
            board.put_if_higher(&entry("Al", 90)).unwrap(),
            ConditionalPut::Rejected { current: 100 }
        );
        assert_eq!(
            board.put_if_higher(&entry("Al", 120)).unwrap(),
            ConditionalPut::Applied { previous: Some(100) }
        );
        assert_eq!(board.get("Al").unwrap().unwrap().score, 120);
    }

    #[test]
    fn test_scan_pages_through_table() {
        let dir = tempdir().unwrap();
        let board = FileLeaderboard::with_page_size(dir.path().join("board.table"), 3).unwrap();
        for i in 0..7u32 {
            board.put(&entry(&format!("p{}", i), i)).unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = board.scan(cursor.as_deref(), 100).unwrap();
            assert!(page.entries.len() <= 3);
            seen.extend(page.entries.into_iter().map(|e| e.player_name));
            match page.next {
                Some(n) => cursor = Some(n),
                None => break,
            }
        }
        assert_eq!(seen, vec!["p0", "p1", "p2", "p3", "p4", "p5", "p6"]);
    }

    #[test]
    fn test_corrupted_body_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.table");
        {
            let board = FileLeaderboard::open(&path).unwrap();
            board.put(&entry("Al", 100)).unwrap();
        }

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x55;
        fs::write(&path, &bytes).unwrap();

        assert!(FileLeaderboard::open(&path).is_err());
    }

    #[test]
    fn test_concurrent_conditional_writes_keep_maximum() {
        let dir = tempdir().unwrap();
        let board = Arc::new(FileLeaderboard::open(dir.path().join("board.table")).unwrap());

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let b = board.clone();
                std::thread::spawn(move || {
                    for i in 0..10u32 {
                        b.put_if_higher(&entry("Al", t * 100 + i)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(board.get("Al").unwrap().unwrap().score, 309);
    }
}
