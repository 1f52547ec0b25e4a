//! [`Transaction`]-related read definitions.

use common::Money;
use rust_decimal::Decimal;

use crate::domain::{Agent, Customer, Land, Transaction};

/// [`Transaction`] hydrated with the entities it references.
#[derive(Clone, Debug)]
pub struct Details {
    /// The [`Transaction`] itself.
    pub transaction: Transaction,

    /// [`Land`] the [`Transaction`] pays for.
    pub land: Land,

    /// Paying [`Customer`].
    pub customer: Customer,

    /// [`Agent`] who brokered the [`Transaction`], if any.
    pub agent: Option<Agent>,
}

/// Payment progress of a single [`Land`].
#[derive(Clone, Debug)]
pub struct LandPayments {
    /// Asking price of the [`Land`].
    pub land_price: Money,

    /// Sum of all non-failed, non-refunded payments.
    pub total_paid: Money,

    /// [`Transaction`]s recorded against the [`Land`], newest first.
    pub transactions: Vec<Transaction>,
}

impl LandPayments {
    /// Returns the outstanding balance.
    ///
    /// Negative when the [`Land`] is overpaid.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.land_price.amount() - self.total_paid.amount()
    }
}

/// Aggregated counters over all [`Transaction`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Total number of [`Transaction`]s.
    pub count: i64,

    /// Sum of all completed payments.
    pub completed_amount: Money,

    /// Sum of all pending payments.
    pub pending_amount: Money,

    /// Total commission accrued.
    pub total_commission: Money,

    /// Commission accrued but not yet paid out.
    pub unpaid_commission: Money,
}

pub mod list {
    //! [`Transaction`] list definitions.

    use common::{pagination, Date};

    use crate::domain::{agent, customer, land, transaction, Transaction};

    /// A [`pagination::Page`] of [`Transaction`]s.
    pub type Page = pagination::Page<Transaction>;

    /// [`Page`] selector.
    #[derive(Clone, Debug, Default)]
    pub struct Selector {
        /// Pagination [`pagination::Arguments`].
        pub arguments: pagination::Arguments,

        /// Additional [`Filter`] being applied to the result.
        pub filter: Filter,
    }

    /// Filter for a [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Term to fuzzy search over business ID and receipt number.
        pub search: Option<String>,

        /// [`transaction::Status`] to filter by.
        pub status: Option<transaction::Status>,

        /// [`transaction::Method`] to filter by.
        pub method: Option<transaction::Method>,

        /// [`land::Id`] to filter by.
        pub land_id: Option<land::Id>,

        /// [`customer::Id`] to filter by.
        pub customer_id: Option<customer::Id>,

        /// [`agent::Id`] to filter by.
        pub agent_id: Option<agent::Id>,

        /// Earliest transaction [`Date`] (inclusive).
        pub from: Option<Date>,

        /// Latest transaction [`Date`] (inclusive).
        pub to: Option<Date>,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Money;
    use rust_decimal::Decimal;

    use super::LandPayments;

    #[test]
    fn balances_against_land_price() {
        let payments = LandPayments {
            land_price: Money::from_str("4800000").unwrap(),
            total_paid: Money::from_str("1200000").unwrap(),
            transactions: vec![],
        };
        assert_eq!(payments.balance(), Decimal::from(3_600_000));

        let overpaid = LandPayments {
            land_price: Money::from_str("100").unwrap(),
            total_paid: Money::from_str("150").unwrap(),
            transactions: vec![],
        };
        assert_eq!(overpaid.balance(), Decimal::from(-50));
    }
}
