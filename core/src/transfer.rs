//! The transfer procedure: debit, check, credit, commit.
//!
//! STATES:
//!   Started -> Committed
//!           -> AbortedNotFound
//!           -> AbortedInsufficientFunds
//!           -> AbortedOnError
//!
//! RULES:
//!   - All three steps run inside one `LedgerSession`.
//!   - Every abort rolls back on that same session; the store is left
//!     exactly as it was before the call.
//!   - No retries. A failure ends the attempt and is returned to the caller.

use crate::{
    error::{TransferError, TransferResult},
    money::Money,
    store::{LedgerSession, LedgerStore, TransferRow},
    types::{AccountNumber, TransferId},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    /// Refused before a session was opened.
    Rejected,
    Started,
    Committed,
    AbortedNotFound,
    AbortedInsufficientFunds,
    AbortedOnError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransferOutcome {
    Committed {
        transfer_id: TransferId,
        source: AccountNumber,
        destination: AccountNumber,
        amount: Money,
        committed_at: DateTime<Utc>,
    },
}

impl TransferOutcome {
    pub fn state(&self) -> TransferState {
        match self {
            TransferOutcome::Committed { .. } => TransferState::Committed,
        }
    }
}

impl TransferError {
    /// Terminal state of the attempt that produced this error.
    pub fn state(&self) -> TransferState {
        match self {
            TransferError::AccountNotFound { .. } => TransferState::AbortedNotFound,
            TransferError::InsufficientFunds { .. } => TransferState::AbortedInsufficientFunds,
            TransferError::TransactionFailed { .. } => TransferState::AbortedOnError,
            TransferError::InvalidRequest { .. } => TransferState::Rejected,
        }
    }
}

/// Move `amount` from `source` to `destination` as one unit of work.
pub fn transfer(
    store: &mut LedgerStore,
    source: &str,
    destination: &str,
    amount: Money,
) -> TransferResult<TransferOutcome> {
    validate(source, destination, amount)?;
    log::debug!("transfer {source} -> {destination} ({amount}): started");

    let session = store.begin()?;

    match apply(&session, source, destination, amount) {
        Ok(row) => {
            if let Err(e) = session.commit() {
                // A failed commit drops the transaction, which rolls it back.
                log::error!("transfer {source} -> {destination}: commit failed: {e}");
                return Err(e.into());
            }
            log::info!(
                "transfer {} committed: {source} -> {destination} ({amount})",
                row.transfer_id
            );
            Ok(TransferOutcome::Committed {
                transfer_id: row.transfer_id,
                source: row.source,
                destination: row.destination,
                amount: row.amount,
                committed_at: row.committed_at,
            })
        }
        Err(err) => {
            if let Err(e) = session.rollback() {
                log::error!("transfer {source} -> {destination}: rollback failed: {e}");
            }
            match err.state() {
                TransferState::AbortedOnError => {
                    log::error!("transfer {source} -> {destination} rolled back: {err}")
                }
                _ => log::warn!("transfer {source} -> {destination} rolled back: {err}"),
            }
            Err(err)
        }
    }
}

fn validate(source: &str, destination: &str, amount: Money) -> TransferResult<()> {
    let reason = if source.trim().is_empty() {
        "source account is empty"
    } else if destination.trim().is_empty() {
        "destination account is empty"
    } else if source == destination {
        "source and destination are the same account"
    } else if !amount.is_positive() {
        "amount must be positive"
    } else {
        return Ok(());
    };
    Err(TransferError::InvalidRequest {
        reason: reason.to_string(),
    })
}

/// Steps 1-3 plus the journal row. The credit is refused if it would
/// overflow the destination balance. Any `Err` leaves the caller to roll back.
fn apply(
    session: &LedgerSession<'_>,
    source: &str,
    destination: &str,
    amount: Money,
) -> TransferResult<TransferRow> {
    if session.debit(source, amount)? == 0 {
        return Err(TransferError::AccountNotFound {
            account: source.to_string(),
        });
    }

    match session.balance_of(source)? {
        Some(balance) if balance.is_negative() => {
            return Err(TransferError::InsufficientFunds {
                account: source.to_string(),
            });
        }
        Some(_) => {}
        None => {
            return Err(TransferError::AccountNotFound {
                account: source.to_string(),
            });
        }
    }

    // SQLite turns an overflowing integer sum into REAL, so the new
    // destination balance is computed here before the credit is applied.
    let dest_balance = session
        .balance_of(destination)?
        .ok_or_else(|| TransferError::AccountNotFound {
            account: destination.to_string(),
        })?;
    if dest_balance.checked_add(amount).is_none() {
        return Err(TransferError::TransactionFailed {
            cause: format!("balance of {destination} would overflow"),
        });
    }

    if session.credit(destination, amount)? == 0 {
        return Err(TransferError::AccountNotFound {
            account: destination.to_string(),
        });
    }

    let row = TransferRow {
        transfer_id: Uuid::new_v4().to_string(),
        source: source.to_string(),
        destination: destination.to_string(),
        amount,
        committed_at: Utc::now(),
    };
    session.record_transfer(&row)?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(n: i64) -> Money {
        Money::from_minor_units(n)
    }

    #[test]
    fn validation_rejects_bad_requests() {
        let cases = [
            ("", "1002", cents(100)),
            ("1001", " ", cents(100)),
            ("1001", "1001", cents(100)),
            ("1001", "1002", Money::ZERO),
            ("1001", "1002", cents(-100)),
        ];
        for (src, dst, amt) in cases {
            let err = validate(src, dst, amt).unwrap_err();
            assert_eq!(err.state(), TransferState::Rejected, "{src:?} -> {dst:?} {amt}");
        }
        assert!(validate("1001", "1002", cents(1)).is_ok());
    }

    #[test]
    fn error_states() {
        let nf = TransferError::AccountNotFound { account: "x".into() };
        let isf = TransferError::InsufficientFunds { account: "x".into() };
        let tf = TransferError::TransactionFailed { cause: "disk".into() };
        assert_eq!(nf.state(), TransferState::AbortedNotFound);
        assert_eq!(isf.state(), TransferState::AbortedInsufficientFunds);
        assert_eq!(tf.state(), TransferState::AbortedOnError);
    }
}
