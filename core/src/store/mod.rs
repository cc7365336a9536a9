//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The transfer procedure drives a `LedgerSession` — it never executes SQL directly.

use crate::{
    config::StoreConfig,
    error::LedgerResult,
    money::Money,
    types::{AccountNumber, TransferId},
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::time::Duration;

mod account;
mod journal;
mod session;

pub use account::demo_accounts;
pub use session::LedgerSession;

/// One row of the `accounts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRow {
    pub account_number: AccountNumber,
    pub owner_name: String,
    pub balance: Money,
}

impl AccountRow {
    pub fn new(account_number: &str, owner_name: &str, balance: Money) -> Self {
        Self {
            account_number: account_number.to_string(),
            owner_name: owner_name.to_string(),
            balance,
        }
    }
}

/// One row of the `transfers` journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRow {
    pub transfer_id: TransferId,
    pub source: AccountNumber,
    pub destination: AccountNumber,
    pub amount: Money,
    pub committed_at: DateTime<Utc>,
}

pub struct LedgerStore {
    conn: Connection,
    config: StoreConfig,
}

impl LedgerStore {
    /// Open (or create) the ledger database described by `config`.
    pub fn open(config: &StoreConfig) -> LedgerResult<Self> {
        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        if !config.is_memory() {
            let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        }
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        log::debug!(
            "opened ledger store at {} (isolation={:?})",
            config.path,
            config.isolation
        );
        Ok(Self {
            conn,
            config: config.clone(),
        })
    }

    /// Open a private in-memory database (used in tests).
    pub fn in_memory() -> LedgerResult<Self> {
        Self::open(&StoreConfig::default_test())
    }

    /// Open a second connection to the same database.
    /// For `:memory:` this is a new, isolated database.
    pub fn reopen(&self) -> LedgerResult<Self> {
        Self::open(&self.config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> LedgerResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_accounts.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_transfers.sql"))?;
        Ok(())
    }

    /// Begin a unit of work using the configured isolation.
    ///
    /// The session borrows the store exclusively until it is committed,
    /// rolled back, or dropped (drop rolls back).
    pub fn begin(&mut self) -> LedgerResult<LedgerSession<'_>> {
        let behavior = self.config.isolation.behavior();
        let tx = self.conn.transaction_with_behavior(behavior)?;
        Ok(LedgerSession::new(tx))
    }
}
