//! [`Query`] collection related to [`Transaction`]s.

use common::operations::By;

use crate::{
    domain::{land, transaction},
    read,
};
#[cfg(doc)]
use crate::{domain::Transaction, Query};

use super::DatabaseQuery;

/// Queries a single hydrated [`Transaction`] by its ID.
pub type Single =
    DatabaseQuery<By<Option<read::transaction::Details>, transaction::Id>>;

/// Queries a page of [`Transaction`]s.
pub type List = DatabaseQuery<
    By<read::transaction::list::Page, read::transaction::list::Selector>,
>;

/// Queries aggregated [`Transaction`] counters.
pub type Stats = DatabaseQuery<By<read::transaction::Stats, ()>>;

/// Queries the payment progress of a single [`Land`].
///
/// [`Land`]: crate::domain::Land
pub type LandPayments =
    DatabaseQuery<By<Option<read::transaction::LandPayments>, land::Id>>;
