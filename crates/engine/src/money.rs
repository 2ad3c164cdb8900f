use std::fmt;

use serde::{Deserialize, Serialize};

/// Signed money amount represented as **integer cents** (US dollars).
///
/// Use this type for **all** monetary values in the engine (drug prices,
/// savings, out-of-pocket figures) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(120_000);
/// assert_eq!(amount.cents(), 120_000);
/// assert_eq!(amount.to_string(), "$1,200.00");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a new amount from whole dollars.
    #[must_use]
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, digit) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        write!(f, "{sign}${grouped}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_usd() {
        assert_eq!(Money::new(0).to_string(), "$0.00");
        assert_eq!(Money::new(1).to_string(), "$0.01");
        assert_eq!(Money::new(1050).to_string(), "$10.50");
        assert_eq!(Money::new(-1050).to_string(), "-$10.50");
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::new(120_000).to_string(), "$1,200.00");
        assert_eq!(Money::new(99_999_999).to_string(), "$999,999.99");
        assert_eq!(Money::new(123_456_789_00).to_string(), "$123,456,789.00");
    }

    #[test]
    fn saturating_sub_does_not_wrap() {
        assert_eq!(Money::new(i64::MIN).saturating_sub(Money::new(1)).cents(), i64::MIN);
        assert_eq!(Money::from_dollars(10).saturating_sub(Money::new(250)).cents(), 750);
        assert_eq!(Money::from_dollars(i64::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_dollars(i64::MIN).cents(), i64::MIN);
    }
}
