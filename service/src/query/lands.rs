//! [`Query`] collection related to [`Land`]s.

use common::operations::By;

use crate::{
    domain::{land, Land},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a single [`Land`] by its ID.
pub type Single = DatabaseQuery<By<Option<Land>, land::Id>>;

/// Queries a page of [`Land`]s.
pub type List =
    DatabaseQuery<By<read::land::list::Page, read::land::list::Selector>>;

/// Queries aggregated [`Land`] counters.
pub type Stats = DatabaseQuery<By<read::land::Stats, ()>>;
