//! Shared primitive types used across the ledger.

/// Unique key of a row in the `accounts` table.
pub type AccountNumber = String;

/// Journal identifier of a committed transfer (UUID v4 text).
pub type TransferId = String;
