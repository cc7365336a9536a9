//! The ledger facade: one store, the transfer procedure, and bootstrap.
//!
//! ORDER for a fresh database:
//!   1. open      (connection parameters from `StoreConfig`)
//!   2. migrate   (schema)
//!   3. seed      (optional demo accounts)
//!   4. transfer  (any number of times)

use crate::{
    config::StoreConfig,
    error::{LedgerResult, TransferResult},
    money::Money,
    store::{AccountRow, LedgerStore},
    transfer::{self, TransferOutcome},
};
use rust_decimal::Decimal;

pub struct Ledger {
    pub store: LedgerStore,
}

impl Ledger {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open the store and apply migrations.
    pub fn open(config: &StoreConfig) -> LedgerResult<Self> {
        let store = LedgerStore::open(config)?;
        store.migrate()?;
        Ok(Self::new(store))
    }

    /// In-memory ledger seeded with the demo accounts (1001: 1000.00, 1002: 500.00).
    pub fn build_test() -> LedgerResult<Self> {
        let mut ledger = Self::open(&StoreConfig::default_test())?;
        ledger.store.seed_demo_accounts()?;
        Ok(ledger)
    }

    pub fn transfer(
        &mut self,
        source: &str,
        destination: &str,
        amount: Money,
    ) -> TransferResult<TransferOutcome> {
        transfer::transfer(&mut self.store, source, destination, amount)
    }

    /// Same as `transfer`, for callers holding a decimal amount.
    pub fn transfer_decimal(
        &mut self,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> TransferResult<TransferOutcome> {
        let amount = Money::from_decimal(amount)?;
        self.transfer(source, destination, amount)
    }

    pub fn balances(&self) -> LedgerResult<Vec<AccountRow>> {
        self.store.accounts()
    }
}
