//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront trades in a single currency (INR), so a price is a
//! decimal amount in rupees rather than an amount/currency pair. Decimal
//! arithmetic keeps cart totals and revenue aggregations exact; float
//! arithmetic would drift across the analytics reducers.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in rupees.
///
/// Serialized as a decimal string (`"399"`) so store documents keep exact
/// amounts regardless of the reader's float semantics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::new(rupees, 0))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let price = Price::from_rupees(399);
        assert_eq!(price * 2, Price::from_rupees(798));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_rupees(399) * 2, Price::from_rupees(350)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_rupees(1148));
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_rupees(500) > Price::from_rupees(499));
        assert!(!Price::ZERO.is_positive());
        assert!(Price::from_rupees(1).is_positive());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_rupees(499).to_string(), "₹499");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Price::from_rupees(399)).unwrap();
        assert_eq!(json, "\"399\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Price::from_rupees(399));
    }
}
