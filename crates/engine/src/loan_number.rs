use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Human-facing loan identifier in the `LN-<digits>` format.
///
/// Parsing is the only way to build one, so a `LoanNumber` in hand is always
/// well formed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoanNumber(String);

/// The input does not match `LN-<digits>`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("loanNumber must look like LN-123")]
pub struct InvalidLoanNumber;

impl LoanNumber {
    const PREFIX: &'static str = "LN-";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds `LN-<index>` zero padded to three digits (`LN-007`).
    pub fn from_index(index: u32) -> Self {
        Self(format!("{}{index:03}", Self::PREFIX))
    }
}

impl FromStr for LoanNumber {
    type Err = InvalidLoanNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(Self::PREFIX).ok_or(InvalidLoanNumber)?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidLoanNumber);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for LoanNumber {
    type Error = InvalidLoanNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LoanNumber> for String {
    fn from(value: LoanNumber) -> Self {
        value.0
    }
}

impl fmt::Display for LoanNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
