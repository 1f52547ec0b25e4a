//! [`Agent`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{Agent, Assignment};

/// Indicator whether an [`Agent`] has any active [`Assignment`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct HasActiveAssignments(pub bool);

impl PartialEq<bool> for HasActiveAssignments {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

pub mod list {
    //! [`Agent`] list definitions.

    use common::pagination;

    use crate::domain::Agent;

    /// A [`pagination::Page`] of [`Agent`]s.
    pub type Page = pagination::Page<Agent>;

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
