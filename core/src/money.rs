//! Currency amounts as integer minor units.
//!
//! RULE: Money never passes through floating point.
//! Decimals enter via `from_decimal` / `FromStr` and are stored as cents.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Fractional digits carried by every amount.
pub const MINOR_UNIT_SCALE: u32 = 2;

const MINOR_UNITS_PER_MAJOR: i64 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("{value} has more than {} decimal places", MINOR_UNIT_SCALE)]
    TooPrecise { value: String },

    #[error("{value} is out of range")]
    OutOfRange { value: String },

    #[error("cannot parse '{input}' as an amount")]
    Parse { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor_units(cents: i64) -> Self {
        Money(cents)
    }

    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.normalize().scale() > MINOR_UNIT_SCALE {
            return Err(MoneyError::TooPrecise {
                value: value.to_string(),
            });
        }
        value
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or_else(|| MoneyError::OutOfRange {
                value: value.to_string(),
            })
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.to_decimal()
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| MoneyError::Parse {
            input: s.to_string(),
        })?;
        Money::from_decimal(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_currency_strings() {
        assert_eq!("200.00".parse::<Money>().unwrap(), Money::from_minor_units(20_000));
        assert_eq!("200".parse::<Money>().unwrap(), Money::from_minor_units(20_000));
        assert_eq!("0.5".parse::<Money>().unwrap(), Money::from_minor_units(50));
        assert_eq!(" 12.34 ".parse::<Money>().unwrap(), Money::from_minor_units(1_234));
    }

    #[test]
    fn rejects_sub_cent_precision() {
        let err = "1.005".parse::<Money>().unwrap_err();
        assert!(matches!(err, MoneyError::TooPrecise { .. }), "got {err:?}");

        // Trailing zeros beyond the scale are still whole cents.
        assert_eq!(Money::from_decimal(dec!(1.500)).unwrap(), Money::from_minor_units(150));
    }

    #[test]
    fn rejects_garbage_and_overflow() {
        assert!(matches!("abc".parse::<Money>(), Err(MoneyError::Parse { .. })));
        assert!(matches!(
            Money::from_decimal(dec!(999999999999999999999)),
            Err(MoneyError::OutOfRange { .. })
        ));
        let max = Money::from_minor_units(i64::MAX);
        assert_eq!(max.checked_add(Money::from_minor_units(1)), None);
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_minor_units(100_000).to_string(), "1000.00");
        assert_eq!(Money::from_minor_units(-5).to_string(), "-0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn sign_checks() {
        assert!(Money::from_minor_units(1).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::from_minor_units(-1).is_negative());
    }

    #[test]
    fn serializes_as_decimal_string() {
        let m = Money::from_minor_units(80_000);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"800.00\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        assert!(serde_json::from_str::<Money>("\"0.001\"").is_err());
    }
}
