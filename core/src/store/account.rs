use super::{AccountRow, LedgerStore};
use crate::{
    error::{LedgerError, LedgerResult},
    money::Money,
};
use rusqlite::{params, OptionalExtension};

/// Starting state of the demo bank: Alice and Bob.
pub fn demo_accounts() -> Vec<AccountRow> {
    vec![
        AccountRow::new("1001", "Alice", Money::from_minor_units(100_000)),
        AccountRow::new("1002", "Bob", Money::from_minor_units(50_000)),
    ]
}

/// No stored balance is ever negative, opening balances included.
fn check_opening_balance(account: &AccountRow) -> LedgerResult<()> {
    if account.balance.is_negative() {
        return Err(LedgerError::InvalidAccount {
            account: account.account_number.clone(),
            reason: format!("negative opening balance {}", account.balance),
        });
    }
    Ok(())
}

impl LedgerStore {
    // ── Account ───────────────────────────────────────────────────

    pub fn insert_account(&self, account: &AccountRow) -> LedgerResult<()> {
        check_opening_balance(account)?;
        self.conn.execute(
            "INSERT INTO accounts (account_number, owner_name, balance) VALUES (?1, ?2, ?3)",
            params![account.account_number, account.owner_name, account.balance],
        )?;
        Ok(())
    }

    /// Insert several accounts as one unit of work. Either all rows land or none.
    pub fn open_accounts(&mut self, accounts: &[AccountRow]) -> LedgerResult<usize> {
        for a in accounts {
            check_opening_balance(a)?;
        }
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO accounts (account_number, owner_name, balance) VALUES (?1, ?2, ?3)",
            )?;
            for a in accounts {
                stmt.execute(params![a.account_number, a.owner_name, a.balance])?;
            }
        }
        tx.commit()?;
        log::debug!("opened {} accounts", accounts.len());
        Ok(accounts.len())
    }

    pub fn account(&self, account_number: &str) -> LedgerResult<Option<AccountRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT account_number, owner_name, balance FROM accounts
                 WHERE account_number = ?1",
                params![account_number],
                |row| {
                    Ok(AccountRow {
                        account_number: row.get(0)?,
                        owner_name: row.get(1)?,
                        balance: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn accounts(&self) -> LedgerResult<Vec<AccountRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_number, owner_name, balance FROM accounts
             ORDER BY account_number",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(AccountRow {
                account_number: row.get(0)?,
                owner_name: row.get(1)?,
                balance: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn balance(&self, account_number: &str) -> LedgerResult<Option<Money>> {
        let balance = self
            .conn
            .query_row(
                "SELECT balance FROM accounts WHERE account_number = ?1",
                params![account_number],
                |row| row.get(0),
            )
            .optional()?;
        Ok(balance)
    }

    /// Sum of all balances. Transfers never change it.
    pub fn total_balance(&self) -> LedgerResult<Money> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(balance), 0) FROM accounts",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Drop every account and journal row.
    pub fn reset_accounts(&self) -> LedgerResult<()> {
        self.conn
            .execute_batch("DELETE FROM transfers; DELETE FROM accounts;")?;
        Ok(())
    }

    /// Reset, then open the demo accounts.
    pub fn seed_demo_accounts(&mut self) -> LedgerResult<()> {
        self.reset_accounts()?;
        self.open_accounts(&demo_accounts())?;
        Ok(())
    }
}
