//! [`Assignment`] definitions.

use common::{define_kind, Date};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{agent, land};

/// Assignment of an [`Agent`] to a [`Land`].
///
/// At most one [`Assignment`] exists per (land, agent) pair.
///
/// [`Agent`]: super::Agent
/// [`Land`]: super::Land
#[derive(Clone, Debug)]
pub struct Assignment {
    /// ID of this [`Assignment`].
    pub id: Id,

    /// ID of the assigned [`Land`].
    ///
    /// [`Land`]: super::Land
    pub land_id: land::Id,

    /// ID of the assigned [`Agent`].
    ///
    /// [`Agent`]: super::Agent
    pub agent_id: agent::Id,

    /// [`Date`] the [`Agent`] was assigned on.
    ///
    /// [`Agent`]: super::Agent
    pub assigned_on: Date,

    /// [`Status`] of this [`Assignment`].
    pub status: Status,

    /// Free-form notes about this [`Assignment`].
    pub notes: Option<String>,
}

/// ID of an [`Assignment`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of an [`Assignment`]."]
    enum Status {
        #[doc = "Assignment is in effect."]
        Active = 1,

        #[doc = "Assignment finished with a sale."]
        Completed = 2,

        #[doc = "Assignment was cancelled."]
        Cancelled = 3,
    }
}
