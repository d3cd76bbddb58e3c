// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Node configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use scorekeeper_kernel::config::{DEFAULT_SCAN_PAGE, LEADERBOARD_SIZE};
use scorekeeper_kernel::UpdateProtocol;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Backing table names. Each one maps to a file under the data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableNames {
    pub scores: String,
    pub leaderboard: String,
    pub words: String,
    pub translations: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            scores: "typing-game-scores".to_string(),
            leaderboard: "typing-game-leaderboard".to_string(),
            words: "typing-game-words".to_string(),
            translations: "typing-game-translations".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub tables: TableNames,
    /// Every route is mounted under each of these prefixes. `""` mounts at the root.
    pub route_prefixes: Vec<String>,
    pub leaderboard_size: usize,
    pub update_protocol: UpdateProtocol,
    pub scan_page_size: usize,
    pub request_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("./data"),
            tables: TableNames::default(),
            route_prefixes: vec!["/api".to_string()],
            leaderboard_size: LEADERBOARD_SIZE,
            update_protocol: UpdateProtocol::default(),
            scan_page_size: DEFAULT_SCAN_PAGE,
            request_timeout: Duration::from_millis(5_000),
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset and empty values are treated alike.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let tables = TableNames {
            scores: table_name(get("SCORES_TABLE_NAME"), "SCORES_TABLE_NAME")?,
            leaderboard: table_name(get("LEADERBOARD_TABLE_NAME"), "LEADERBOARD_TABLE_NAME")?,
            words: table_name(get("WORDS_TABLE_NAME"), "WORDS_TABLE_NAME")?,
            translations: table_name(
                get("TRANSLATIONS_TABLE_NAME").or(Some(defaults.tables.translations.clone())),
                "TRANSLATIONS_TABLE_NAME",
            )?,
        };

        let bind_addr = match get("BIND_ADDR") {
            Some(v) => parse("BIND_ADDR", v)?,
            None => defaults.bind_addr,
        };
        let data_dir = get("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir);

        let base = normalize_prefix(get("API_BASE_PATH").as_deref().unwrap_or("/api"));
        let mut route_prefixes = vec![base.clone()];
        if let Some(stage) = get("API_STAGE") {
            let stage_segment = normalize_prefix(&stage);
            if stage_segment.is_empty() {
                return Err(ConfigError::Invalid { key: "API_STAGE", value: stage });
            }
            let staged = normalize_prefix(&format!("{}{}", stage_segment, base));
            if !route_prefixes.contains(&staged) {
                route_prefixes.push(staged);
            }
        }

        let leaderboard_size = match get("LEADERBOARD_SIZE") {
            Some(v) => positive("LEADERBOARD_SIZE", v)?,
            None => defaults.leaderboard_size,
        };
        let scan_page_size = match get("SCAN_PAGE_SIZE") {
            Some(v) => positive("SCAN_PAGE_SIZE", v)?,
            None => defaults.scan_page_size,
        };
        let request_timeout = match get("REQUEST_TIMEOUT_MS") {
            Some(v) => Duration::from_millis(positive("REQUEST_TIMEOUT_MS", v)? as u64),
            None => defaults.request_timeout,
        };
        let update_protocol = match get("LEADERBOARD_UPDATE_MODE").as_deref() {
            None | Some("conditional") => UpdateProtocol::Conditional,
            Some("read-then-write") => UpdateProtocol::ReadThenWrite,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LEADERBOARD_UPDATE_MODE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            data_dir,
            tables,
            route_prefixes,
            leaderboard_size,
            update_protocol,
            scan_page_size,
            request_timeout,
        })
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.ledger", self.tables.scores))
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.table", self.tables.leaderboard))
    }

    pub fn words_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.tables.words))
    }

    pub fn translations_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.tables.translations))
    }
}

fn table_name(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(key))?;
    // Table names become file names.
    if value.contains(['/', '\\']) || value.starts_with('.') {
        return Err(ConfigError::Invalid { key, value });
    }
    Ok(value)
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { key, value })
}

fn positive(key: &'static str, value: String) -> Result<usize, ConfigError> {
    match parse::<usize>(key, value.clone())? {
        0 => Err(ConfigError::Invalid { key, value }),
        n => Ok(n),
    }
}

/// `"api/"` -> `"/api"`, `"//prod//api"` -> `"/prod/api"`, `"/"` -> `""`.
fn normalize_prefix(raw: &str) -> String {
    raw.trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut out, segment| {
            out.push('/');
            out.push_str(segment);
            out
        })
}
