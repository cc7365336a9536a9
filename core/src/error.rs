use crate::{money::MoneyError, types::AccountNumber};
use thiserror::Error;

/// Errors from store setup and account bookkeeping.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Account {account} rejected: {reason}")]
    InvalidAccount {
        account: AccountNumber,
        reason: String,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Why a transfer did not commit.
///
/// Every variant guarantees the store is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Account {account} not found")]
    AccountNotFound { account: AccountNumber },

    #[error("Insufficient funds in account {account}")]
    InsufficientFunds { account: AccountNumber },

    #[error("Transaction failed: {cause}")]
    TransactionFailed { cause: String },

    #[error("Invalid transfer request: {reason}")]
    InvalidRequest { reason: String },
}

impl From<LedgerError> for TransferError {
    fn from(e: LedgerError) -> Self {
        TransferError::TransactionFailed {
            cause: e.to_string(),
        }
    }
}

impl From<MoneyError> for TransferError {
    fn from(e: MoneyError) -> Self {
        TransferError::InvalidRequest {
            reason: e.to_string(),
        }
    }
}

pub type TransferResult<T> = Result<T, TransferError>;
