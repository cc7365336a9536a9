use super::{LedgerStore, TransferRow};
use crate::error::LedgerResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type};

impl LedgerStore {
    // ── Transfer journal ──────────────────────────────────────────

    /// Committed transfers touching `account`, oldest first.
    pub fn transfers_for(&self, account: &str) -> LedgerResult<Vec<TransferRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT transfer_id, source, destination, amount, committed_at
             FROM transfers WHERE source = ?1 OR destination = ?1
             ORDER BY committed_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![account], |row| {
            let committed_at: String = row.get(4)?;
            let committed_at = DateTime::parse_from_rfc3339(&committed_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);
            Ok(TransferRow {
                transfer_id: row.get(0)?,
                source: row.get(1)?,
                destination: row.get(2)?,
                amount: row.get(3)?,
                committed_at,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn transfer_count(&self) -> LedgerResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM transfers", [], |row| row.get(0))?;
        Ok(count)
    }
}
