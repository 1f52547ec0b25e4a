//! [`Money`]-related definitions.

use std::{iter::Sum, ops, str::FromStr};

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Non-negative monetary amount with a two decimal places precision.
///
/// Backed by a fixed-point [`Decimal`], so summing many amounts never
/// accumulates binary floating-point drift.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct Money(Decimal);

impl Money {
    /// [`Money`] amount of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] amount if the given `amount` is non-negative.
    ///
    /// The amount is rescaled to two decimal places, rounding half away from
    /// zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then(|| {
            Self(amount.round_dp_with_strategy(
                2,
                rust_decimal::RoundingStrategy::MidpointAwayFromZero,
            ))
        })
    }

    /// Returns the inner [`Decimal`] amount of this [`Money`].
    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, ops::Add::add)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Money` amount")
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("4800000").unwrap().amount(),
            decimal("4800000"),
        );
        assert_eq!(
            Money::from_str("123.45").unwrap().amount(),
            decimal("123.45"),
        );
        assert_eq!(Money::from_str("0").unwrap(), Money::ZERO);

        assert!(Money::from_str("-1").is_err());
        assert!(Money::from_str("12,3").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn rescales_to_two_places() {
        assert_eq!(
            Money::new(decimal("10.005")).unwrap().amount(),
            decimal("10.01"),
        );
        assert_eq!(
            Money::new(decimal("10.004")).unwrap().amount(),
            decimal("10.00"),
        );
    }

    #[test]
    fn sums_without_drift() {
        let total: Money =
            std::iter::repeat(Money::from_str("0.10").unwrap())
                .take(1000)
                .sum();
        assert_eq!(total.amount(), decimal("100.00"));
    }
}
