//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use crate::Money;

/// Percentage between `0` and `100` (inclusive).
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(transparent)
)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a new [`Percent`] by checking the provided value is
    /// greater than `0` and less than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (val >= Decimal::ZERO && val <= Decimal::ONE_HUNDRED)
            .then_some(Self(val))
    }

    /// Takes this [`Percent`] of the provided [`Money`] amount.
    ///
    /// The result is rounded to two decimal places, half away from zero.
    #[expect(clippy::missing_panics_doc, reason = "result is non-negative")]
    #[must_use]
    pub fn of(self, amount: Money) -> Money {
        Money::new(amount.amount() * self.0 / Decimal::ONE_HUNDRED)
            .expect("non-negative by construction")
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::{Money, Percent};

    #[test]
    fn from_str() {
        assert!(Percent::from_str("0").is_ok());
        assert!(Percent::from_str("2.5").is_ok());
        assert!(Percent::from_str("100").is_ok());

        assert!(Percent::from_str("-0.1").is_err());
        assert!(Percent::from_str("100.1").is_err());
        assert!(Percent::from_str("five").is_err());
    }

    #[test]
    fn of_amount() {
        let percent = Percent::from_str("2.5").unwrap();
        let amount = Money::from_str("4800000").unwrap();
        assert_eq!(percent.of(amount), Money::from_str("120000").unwrap());

        let percent = Percent::from_str("3").unwrap();
        let amount = Money::from_str("100.33").unwrap();
        // 3.0099 rounds half away from zero to 3.01.
        assert_eq!(percent.of(amount), Money::from_str("3.01").unwrap());

        assert_eq!(
            Percent::from_str("0").unwrap().of(amount),
            Money::ZERO,
        );
    }
}
