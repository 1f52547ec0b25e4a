//! [`Query`] collection related to [`User`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{user, User},
    read,
};

use super::DatabaseQuery;

/// Queries a single [`User`] by its ID.
pub type Single = DatabaseQuery<By<Option<User>, user::Id>>;

/// Queries a page of [`User`]s.
pub type List =
    DatabaseQuery<By<read::user::list::Page, read::user::list::Selector>>;
