//! [`User`]-related read definitions.

#[cfg(doc)]
use crate::domain::User;

pub mod list {
    //! [`User`] list definitions.

    use common::pagination;

    use crate::domain::{user, User};

    /// A [`pagination::Page`] of [`User`]s.
    pub type Page = pagination::Page<User>;

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
        /// Term to fuzzy search over username, email and full name.
        pub search: Option<String>,

        /// [`user::Role`] to filter by.
        pub role: Option<user::Role>,

        /// Active flag to filter by.
        pub is_active: Option<bool>,
    }
}
