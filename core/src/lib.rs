//! Ledger core: accounts in SQLite and an atomic funds transfer.

pub mod config;
pub mod error;
pub mod ledger;
pub mod money;
pub mod store;
pub mod transfer;
pub mod types;

pub use error::{LedgerError, LedgerResult, TransferError, TransferResult};
pub use ledger::Ledger;
pub use money::Money;
pub use transfer::{TransferOutcome, TransferState};
