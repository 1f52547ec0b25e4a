//! [`Query`] collection related to the activity log.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::read;

use super::DatabaseQuery;

/// Queries a page of activity log entries.
pub type List = DatabaseQuery<
    By<read::activity::list::Page, read::activity::list::Selector>,
>;
