//! Activity log definitions.

use common::{define_kind, DateTime};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user;

/// Append-only record of a [`User`] action.
///
/// [`User`]: super::User
#[derive(Clone, Debug)]
pub struct Entry {
    /// ID of this [`Entry`].
    pub id: Id,

    /// ID of the [`User`] who performed the action.
    ///
    /// [`User`]: super::User
    pub user_id: user::Id,

    /// Performed [`Action`].
    pub action: Action,

    /// [`Entity`] the action was performed upon.
    pub entity: Entity,

    /// Identifier of the affected entity, if any.
    pub entity_id: Option<String>,

    /// Human-readable description of the action.
    pub description: String,

    /// JSON snapshot of the entity before the action.
    pub old_values: Option<serde_json::Value>,

    /// JSON snapshot of the entity after the action.
    pub new_values: Option<serde_json::Value>,

    /// IP address the request came from.
    pub ip_address: Option<String>,

    /// User agent of the client.
    pub user_agent: Option<String>,

    /// [`DateTime`] when this [`Entry`] was recorded.
    pub created_at: DateTime,
}

/// ID of an [`Entry`].
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
    #[doc = "Action recorded in an [`Entry`]."]
    enum Action {
        #[doc = "Entity was created."]
        Create = 1,

        #[doc = "Entity was updated."]
        Update = 2,

        #[doc = "Entity was deleted."]
        Delete = 3,

        #[doc = "Agent was assigned to a land."]
        Assign = 4,

        #[doc = "User logged in."]
        Login = 5,
    }
}

define_kind! {
    #[doc = "Entity an [`Entry`] action was performed upon."]
    enum Entity {
        #[doc = "A land parcel."]
        Land = 1,

        #[doc = "A customer."]
        Customer = 2,

        #[doc = "An agent."]
        Agent = 3,

        #[doc = "A transaction."]
        Transaction = 4,

        #[doc = "A user account."]
        User = 5,
    }
}
