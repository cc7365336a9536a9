//! Store connection parameters.
//!
//! Nothing here is hardcoded into the store: callers load a `StoreConfig`
//! from a JSON file, from the environment, or use `default_test()`.

use crate::error::{LedgerError, LedgerResult};
use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_DB_PATH: &str = "LEDGER_DB_PATH";
pub const ENV_ISOLATION: &str = "LEDGER_ISOLATION";
pub const ENV_BUSY_TIMEOUT_MS: &str = "LEDGER_BUSY_TIMEOUT_MS";

/// How a unit of work claims the database when it begins.
///
/// SQLite serializes writers; this picks when the write lock is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Isolation {
    /// `BEGIN DEFERRED`: lock taken at the first write.
    Deferred,
    /// `BEGIN IMMEDIATE`: write lock taken up front.
    #[default]
    Immediate,
    /// `BEGIN EXCLUSIVE`
    Exclusive,
}

impl Isolation {
    pub fn behavior(self) -> TransactionBehavior {
        match self {
            Isolation::Deferred => TransactionBehavior::Deferred,
            Isolation::Immediate => TransactionBehavior::Immediate,
            Isolation::Exclusive => TransactionBehavior::Exclusive,
        }
    }
}

impl FromStr for Isolation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deferred" => Ok(Isolation::Deferred),
            "immediate" => Ok(Isolation::Immediate),
            "exclusive" => Ok(Isolation::Exclusive),
            other => Err(LedgerError::Config {
                reason: format!("unknown isolation '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// File path or SQLite URI. `:memory:` opens a private database.
    pub path: String,
    #[serde(default)]
    pub isolation: Isolation,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl StoreConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            isolation: Isolation::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }

    /// Load from a JSON file.
    pub fn load(file: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file)
            .map_err(|e| anyhow::anyhow!("Cannot read {file}: {e}"))?;
        let config: StoreConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {file}: {e}"))?;
        Ok(config)
    }

    /// Read `LEDGER_DB_PATH`, `LEDGER_ISOLATION` and `LEDGER_BUSY_TIMEOUT_MS`.
    pub fn from_env() -> LedgerResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys fall back to defaults.
    pub fn from_vars<F>(lookup: F) -> LedgerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(ENV_DB_PATH).unwrap_or_else(|| "ledger.db".to_string());
        if path.trim().is_empty() {
            return Err(LedgerError::Config {
                reason: format!("{ENV_DB_PATH} is empty"),
            });
        }
        let isolation = match lookup(ENV_ISOLATION) {
            Some(v) => v.parse()?,
            None => Isolation::default(),
        };
        let busy_timeout_ms = match lookup(ENV_BUSY_TIMEOUT_MS) {
            Some(v) => v.trim().parse().map_err(|_| LedgerError::Config {
                reason: format!("{ENV_BUSY_TIMEOUT_MS} must be milliseconds, got '{v}'"),
            })?,
            None => default_busy_timeout_ms(),
        };
        Ok(Self {
            path,
            isolation,
            busy_timeout_ms,
        })
    }

    /// Private in-memory database with defaults suited to tests.
    pub fn default_test() -> Self {
        Self {
            path: ":memory:".into(),
            isolation: Isolation::Immediate,
            busy_timeout_ms: 1_000,
        }
    }

    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
            || self.path.starts_with("file::memory:")
            || self.path.contains("mode=memory")
    }
}
