//! [`Customer`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::Customer;
use crate::domain::{Land, Transaction};

/// Indicator whether a [`Customer`] is referenced by any [`Transaction`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct HasTransactions(pub bool);

impl PartialEq<bool> for HasTransactions {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

/// Purchase history of a [`Customer`].
#[derive(Clone, Debug)]
pub struct Purchases {
    /// [`Land`]s purchased by the [`Customer`].
    pub lands: Vec<Land>,

    /// [`Transaction`]s recorded for the [`Customer`].
    pub transactions: Vec<Transaction>,
}

pub mod list {
    //! [`Customer`] list definitions.

    use common::pagination;

    use crate::domain::Customer;

    /// A [`pagination::Page`] of [`Customer`]s.
    pub type Page = pagination::Page<Customer>;

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
        /// Term to fuzzy search over business ID, name, phone and email.
        pub search: Option<String>,

        /// Active flag to filter by.
        pub is_active: Option<bool>,
    }
}
