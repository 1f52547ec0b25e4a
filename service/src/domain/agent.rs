//! [`Agent`] definitions.

use std::{str::FromStr, sync::LazyLock};

use common::{Date, DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact;

/// Sales agent earning a commission on recorded transactions.
#[derive(Clone, Debug)]
pub struct Agent {
    /// ID of this [`Agent`].
    pub id: Id,

    /// Human-facing [`BusinessId`] of this [`Agent`].
    pub business_id: BusinessId,

    /// Name of this [`Agent`].
    pub name: contact::Name,

    /// Phone number of this [`Agent`].
    pub phone: contact::Phone,

    /// Email address of this [`Agent`].
    pub email: Option<contact::Email>,

    /// Postal address of this [`Agent`].
    pub address: Option<String>,

    /// Commission rate of this [`Agent`].
    pub commission_percent: Percent,

    /// [`Date`] this [`Agent`] joined on.
    pub joining_date: Date,

    /// Indicator whether this [`Agent`] is active.
    pub is_active: bool,

    /// Number of sales recorded through this [`Agent`].
    pub total_sales: i32,

    /// Total commission earned by this [`Agent`].
    pub total_commission_earned: Money,

    /// Name of the bank this [`Agent`] is paid through.
    pub bank_name: Option<String>,

    /// Bank account number of this [`Agent`].
    pub bank_account: Option<String>,

    /// IFSC code of the [`Agent`]'s bank branch.
    pub bank_ifsc: Option<String>,

    /// Free-form notes about this [`Agent`].
    pub notes: Option<String>,

    /// [`DateTime`] when this [`Agent`] was created.
    pub created_at: DateTime,
}

/// ID of an [`Agent`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    derive_more::FromStr,
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

/// Human-facing identifier of an [`Agent`] (`AGT-0042`).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct BusinessId(String);

impl BusinessId {
    /// Formats a new [`BusinessId`] out of the allocated sequence number.
    #[must_use]
    pub fn from_seq(seq: i64) -> Self {
        Self(format!("AGT-{seq:04}"))
    }

    /// Creates a new [`BusinessId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`BusinessId`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression checking [`BusinessId`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^AGT-\d{4,}$").expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for BusinessId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `agent::BusinessId`")
    }
}

#[cfg(test)]
mod spec {
    use super::BusinessId;

    #[test]
    fn formats_business_id() {
        assert_eq!(BusinessId::from_seq(3).to_string(), "AGT-0003");
        assert_eq!(BusinessId::from_seq(9999).to_string(), "AGT-9999");
        assert_eq!(BusinessId::from_seq(10_000).to_string(), "AGT-10000");

        assert!(BusinessId::new("AGT-0003").is_some());
        assert!(BusinessId::new("AGT-3").is_none());
    }
}
