use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::Currency;

/// Signed money amount represented as **integer minor units** (laari for MVR).
///
/// Use this type for **all** monetary values in the engine (principal, EMI,
/// outstanding and overdue balances) to avoid floating-point drift. The value
/// is signed so that boundary validation can reject negative input with a
/// precise message instead of a parse failure.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "MVR 12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

/// Why a string could not be read as [`Money`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates a new amount from whole major units.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns the value in major units, for JSON output.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Display string in the given currency, e.g. `MVR 100,000.00`.
    #[must_use]
    pub fn display(self, currency: Currency) -> String {
        currency.format_minor(self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(Currency::default()))
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or(ParseMoneyError::Invalid)?;
        let minor_str = parts.next();

        if parts.next().is_some() {
            return Err(ParseMoneyError::Invalid);
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseMoneyError::Invalid);
        }

        let major: i64 = major_str.parse().map_err(|_| ParseMoneyError::Overflow)?;

        let minor: i64 = match minor_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ParseMoneyError::Invalid);
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)? * 10,
                    2 => frac.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)?,
                    _ => return Err(ParseMoneyError::TooManyDecimals),
                }
            }
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_mvr() {
        assert_eq!(Money::new(0).to_string(), "MVR 0.00");
        assert_eq!(Money::new(1).to_string(), "MVR 0.01");
        assert_eq!(Money::new(1050).to_string(), "MVR 10.50");
        assert_eq!(Money::from_major(100_000).to_string(), "MVR 100,000.00");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("12.345".parse::<Money>(), Err(ParseMoneyError::TooManyDecimals));
        assert_eq!("".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert_eq!("abc".parse::<Money>(), Err(ParseMoneyError::Invalid));
        assert_eq!("1.2.3".parse::<Money>(), Err(ParseMoneyError::Invalid));
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(ParseMoneyError::Overflow)
        );
    }

    #[test]
    fn major_units_round_trip_through_json_numbers() {
        assert_eq!(Money::new(450_050).to_major(), 4500.5);
        assert_eq!(Money::from_major(80_000).to_major(), 80000.0);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(
            Money::new(100).checked_add(Money::new(250)),
            Some(Money::new(350))
        );
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
    }
}
