use super::TransferRow;
use crate::{error::LedgerResult, money::Money};
use rusqlite::{params, OptionalExtension, Transaction};

/// An open unit of work on one connection.
///
/// Every abort must go through `rollback` on this same handle. Dropping
/// the session without finishing it also rolls back.
pub struct LedgerSession<'a> {
    tx: Transaction<'a>,
}

impl<'a> LedgerSession<'a> {
    pub(super) fn new(tx: Transaction<'a>) -> Self {
        Self { tx }
    }

    /// `balance -= amount`. Returns the number of rows matched.
    pub fn debit(&self, account: &str, amount: Money) -> LedgerResult<usize> {
        let rows = self.tx.execute(
            "UPDATE accounts SET balance = balance - ?1 WHERE account_number = ?2",
            params![amount, account],
        )?;
        Ok(rows)
    }

    /// `balance += amount`. Returns the number of rows matched.
    pub fn credit(&self, account: &str, amount: Money) -> LedgerResult<usize> {
        let rows = self.tx.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE account_number = ?2",
            params![amount, account],
        )?;
        Ok(rows)
    }

    /// Balance as seen inside this unit of work, pending changes included.
    pub fn balance_of(&self, account: &str) -> LedgerResult<Option<Money>> {
        let balance = self
            .tx
            .query_row(
                "SELECT balance FROM accounts WHERE account_number = ?1",
                params![account],
                |row| row.get(0),
            )
            .optional()?;
        Ok(balance)
    }

    pub fn record_transfer(&self, row: &TransferRow) -> LedgerResult<()> {
        self.tx.execute(
            "INSERT INTO transfers (transfer_id, source, destination, amount, committed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.transfer_id,
                row.source,
                row.destination,
                row.amount,
                row.committed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn commit(self) -> LedgerResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> LedgerResult<()> {
        self.tx.rollback()?;
        Ok(())
    }
}
