use serde::{Deserialize, Serialize};

/// ISO currency code used to display loan amounts.
///
/// Loanbook is mono-currency (`MVR`). Amounts are stored as an `i64` number of
/// **minor units** (see [`Money`](crate::Money)); `minor_units()` tells how
/// many decimal digits separate major from minor units.
///
/// Example: MVR has 2 minor units (laari), so `10.50 MVR` ⇄ `1050`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Mvr,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Mvr => "MVR",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Mvr => 2,
        }
    }

    /// Formats a minor-unit amount for display, e.g. `MVR 100,000.00`.
    #[must_use]
    pub fn format_minor(self, minor: i64) -> String {
        let scale = 10u64.pow(u32::from(self.minor_units()));
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.unsigned_abs();
        let major = group_thousands(abs / scale);
        let fraction = abs % scale;
        let width = usize::from(self.minor_units());
        format!("{sign}{} {major}.{fraction:0width$}", self.code())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}
