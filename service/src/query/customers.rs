//! [`Query`] collection related to [`Customer`]s.

use common::operations::By;

use crate::{
    domain::{customer, Customer},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a single [`Customer`] by its ID.
pub type Single = DatabaseQuery<By<Option<Customer>, customer::Id>>;

/// Queries a page of [`Customer`]s.
pub type List = DatabaseQuery<
    By<read::customer::list::Page, read::customer::list::Selector>,
>;

/// Queries the purchase history of a [`Customer`].
pub type Purchases =
    DatabaseQuery<By<read::customer::Purchases, customer::Id>>;
