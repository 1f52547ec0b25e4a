//! [`Land`]-related read definitions.

use common::Money;
use derive_more::Deref;

#[cfg(doc)]
use crate::domain::Land;

/// Indicator whether a [`Land`] is referenced by any [`Transaction`].
///
/// [`Transaction`]: crate::domain::Transaction
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct HasTransactions(pub bool);

impl PartialEq<bool> for HasTransactions {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

/// Aggregated counters over all [`Land`]s, grouped by status.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of available [`Land`]s.
    pub available: i64,

    /// Number of reserved [`Land`]s.
    pub reserved: i64,

    /// Number of sold [`Land`]s.
    pub sold: i64,

    /// Total asking price over all [`Land`]s.
    pub total_value: Money,

    /// Total asking price over sold [`Land`]s.
    pub sold_value: Money,
}

impl Stats {
    /// Returns the total number of [`Land`]s.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.available + self.reserved + self.sold
    }
}

pub mod list {
    //! [`Land`] list definitions.

    use common::{pagination, Money};

    use crate::domain::{agent, land, Land};

    /// A [`pagination::Page`] of [`Land`]s.
    pub type Page = pagination::Page<Land>;

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
        /// Term to fuzzy search over business ID, location, survey number
        /// and description.
        pub search: Option<String>,

        /// [`land::Status`] to filter by.
        pub status: Option<land::Status>,

        /// [`land::Kind`] to filter by.
        pub kind: Option<land::Kind>,

        /// Minimum asking price.
        pub min_price: Option<Money>,

        /// Maximum asking price.
        pub max_price: Option<Money>,

        /// Primary [`agent::Id`] to filter by.
        pub agent_id: Option<agent::Id>,
    }
}
