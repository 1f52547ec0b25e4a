//! [`Query`] collection related to [`Agent`]s.

use common::operations::By;

use crate::{
    domain::{agent, Agent},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a single [`Agent`] by its ID.
pub type Single = DatabaseQuery<By<Option<Agent>, agent::Id>>;

/// Queries a page of [`Agent`]s.
pub type List =
    DatabaseQuery<By<read::agent::list::Page, read::agent::list::Selector>>;
