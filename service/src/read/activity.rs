//! Activity log read definitions.

pub mod list {
    //! Activity log list definitions.

    use common::pagination;

    use crate::domain::{activity, user};

    /// A [`pagination::Page`] of [`activity::Entry`]s.
    pub type Page = pagination::Page<activity::Entry>;

    /// [`Page`] selector.
    #[derive(Clone, Debug, Default)]
    pub struct Selector {
        /// Pagination [`pagination::Arguments`].
        pub arguments: pagination::Arguments,

        /// Additional [`Filter`] being applied to the result.
        pub filter: Filter,
    }

    /// Filter for a [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`user::Id`] to filter by.
        pub user_id: Option<user::Id>,

        /// [`activity::Entity`] to filter by.
        pub entity: Option<activity::Entity>,

        /// [`activity::Action`] to filter by.
        pub action: Option<activity::Action>,
    }
}
