//! [`Customer`] definitions.

use std::{str::FromStr, sync::LazyLock};

use common::{define_kind, DateTime};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{contact, FileRef};

/// Customer buying (or interested in) land parcels.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// Human-facing [`BusinessId`] of this [`Customer`].
    pub business_id: BusinessId,

    /// Name of this [`Customer`].
    pub name: contact::Name,

    /// Phone number of this [`Customer`].
    pub phone: contact::Phone,

    /// Email address of this [`Customer`].
    pub email: Option<contact::Email>,

    /// Postal address of this [`Customer`].
    pub address: Option<String>,

    /// City of this [`Customer`].
    pub city: Option<String>,

    /// State of this [`Customer`].
    pub state: Option<String>,

    /// Postal code of this [`Customer`].
    pub pincode: Option<String>,

    /// Kind of the identity proof provided by this [`Customer`].
    pub id_proof_kind: Option<IdProofKind>,

    /// Number of the identity proof provided by this [`Customer`].
    pub id_proof_number: Option<String>,

    /// Reference to the uploaded identity proof document.
    pub id_proof_file: Option<FileRef>,

    /// Indicator whether this [`Customer`] is active.
    pub is_active: bool,

    /// Free-form notes about this [`Customer`].
    pub notes: Option<String>,

    /// [`DateTime`] when this [`Customer`] was created.
    pub created_at: DateTime,
}

/// ID of a [`Customer`].
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

/// Human-facing identifier of a [`Customer`] (`CUST-00042`).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct BusinessId(String);

impl BusinessId {
    /// Formats a new [`BusinessId`] out of the allocated sequence number.
    #[must_use]
    pub fn from_seq(seq: i64) -> Self {
        Self(format!("CUST-{seq:05}"))
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
            Regex::new(r"^CUST-\d{5,}$").expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for BusinessId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `customer::BusinessId`")
    }
}

define_kind! {
    #[doc = "Kind of an identity proof document."]
    enum IdProofKind {
        #[doc = "Aadhaar card."]
        Aadhaar = 1,

        #[doc = "PAN card."]
        Pan = 2,

        #[doc = "Passport."]
        Passport = 3,

        #[doc = "Voter ID card."]
        VoterId = 4,

        #[doc = "Driving license."]
        DrivingLicense = 5,
    }
}

#[cfg(test)]
mod spec {
    use super::BusinessId;

    #[test]
    fn formats_business_id() {
        assert_eq!(BusinessId::from_seq(7).to_string(), "CUST-00007");
        assert_eq!(BusinessId::from_seq(99_999).to_string(), "CUST-99999");
        assert_eq!(BusinessId::from_seq(100_000).to_string(), "CUST-100000");

        assert!(BusinessId::new("CUST-00007").is_some());
        assert!(BusinessId::new("LAND-00007").is_none());
    }
}
