use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// A monetary value in the store's single currency.
///
/// This is a wrapper around `rust_decimal::Decimal` so prices, fees and totals
/// cannot be mixed up with quantities or rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Rounds to whole cents, half away from zero.
    pub fn to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Applies a rate (e.g. `0.08`) and rounds the result to cents.
    pub fn percent_of(self, rate: Decimal) -> Self {
        Self(self.0 * rate).to_cents()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;
    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(10.00));
        let b = Money::new(dec!(2.50));
        assert_eq!(a + b, Money::new(dec!(12.50)));
        assert_eq!(a - b, Money::new(dec!(7.50)));
        assert_eq!(b * 3, Money::new(dec!(7.50)));
    }

    #[test]
    fn test_percent_of_rounds_to_cents() {
        assert_eq!(
            Money::new(dec!(20.00)).percent_of(dec!(0.08)),
            Money::new(dec!(1.60))
        );
        // 0.99 * 0.08 = 0.0792
        assert_eq!(
            Money::new(dec!(0.99)).percent_of(dec!(0.08)),
            Money::new(dec!(0.08))
        );
        // 0.0625 * 0.08 = 0.005 rounds away from zero
        assert_eq!(
            Money::new(dec!(0.0625)).percent_of(dec!(0.08)),
            Money::new(dec!(0.01))
        );
    }

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Money::new(dec!(24.6)).to_string(), "24.60");
        assert_eq!(Money::new(dec!(3)).to_string(), "3.00");
    }

    #[test]
    fn test_sum() {
        let total: Money = [dec!(1.10), dec!(2.20), dec!(3.30)]
            .into_iter()
            .map(Money::new)
            .sum();
        assert_eq!(total, Money::new(dec!(6.60)));
    }
}
