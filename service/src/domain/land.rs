//! [`Land`] definitions.

use std::{str::FromStr, sync::LazyLock};

use common::{define_kind, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{agent, customer, FileRef};

/// Land parcel offered for sale.
#[derive(Clone, Debug)]
pub struct Land {
    /// ID of this [`Land`].
    pub id: Id,

    /// Human-facing [`BusinessId`] of this [`Land`].
    pub business_id: BusinessId,

    /// [`Location`] of this [`Land`].
    pub location: Location,

    /// Size of the area of this [`Land`], in [`Land::area_unit`]s.
    pub area_size: Decimal,

    /// Unit the [`Land::area_size`] is measured in.
    pub area_unit: AreaUnit,

    /// Asking price for this [`Land`].
    pub price: Money,

    /// [`SurveyNumber`] of this [`Land`], if registered.
    pub survey_number: Option<SurveyNumber>,

    /// [`Kind`] of this [`Land`].
    pub kind: Kind,

    /// Sale [`Status`] of this [`Land`].
    pub status: Status,

    /// Free-form description of this [`Land`].
    pub description: Option<String>,

    /// References to documents attached to this [`Land`].
    pub documents: Vec<FileRef>,

    /// Geographic [`Coordinates`] of this [`Land`], if surveyed.
    pub coordinates: Option<Coordinates>,

    /// [`Customer`] who purchased this [`Land`], if sold.
    ///
    /// [`Customer`]: super::Customer
    pub purchased_by: Option<customer::Id>,

    /// Primary [`Agent`] assigned to this [`Land`].
    ///
    /// [`Agent`]: super::Agent
    pub primary_agent_id: Option<agent::Id>,

    /// [`DateTime`] when this [`Land`] was created.
    pub created_at: DateTime,
}

impl Land {
    /// Applies a recorded payment of the given `payment_kind` made by the
    /// `buyer` to this [`Land`].
    ///
    /// A full payment marks the [`Land`] as [`Status::Sold`] and records the
    /// `buyer`. Any other payment reserves an [`Status::Available`] [`Land`]
    /// and leaves the buyer untouched. Otherwise nothing changes.
    pub fn apply_payment(
        &mut self,
        payment_kind: super::transaction::PaymentKind,
        buyer: customer::Id,
    ) {
        use super::transaction::PaymentKind as P;

        match payment_kind {
            P::Full => {
                self.status = Status::Sold;
                self.purchased_by = Some(buyer);
            }
            P::Installment | P::Advance | P::Token => {
                if self.status == Status::Available {
                    self.status = Status::Reserved;
                }
            }
        }
    }
}

/// ID of a [`Land`].
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

/// Human-facing identifier of a [`Land`] (`LAND-00042`).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct BusinessId(String);

impl BusinessId {
    /// Formats a new [`BusinessId`] out of the allocated sequence number.
    #[must_use]
    pub fn from_seq(seq: i64) -> Self {
        Self(format!("LAND-{seq:05}"))
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
            Regex::new(r"^LAND-\d{5,}$").expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for BusinessId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `land::BusinessId`")
    }
}

/// Location of a [`Land`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Survey number of a [`Land`] in the land registry.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct SurveyNumber(String);

impl SurveyNumber {
    /// Creates a new [`SurveyNumber`] if the given `num` is valid.
    #[must_use]
    pub fn new(num: impl Into<String>) -> Option<Self> {
        let num = num.into();
        Self::check(&num).then_some(Self(num))
    }

    /// Checks whether the given `num` is a valid [`SurveyNumber`].
    fn check(num: impl AsRef<str>) -> bool {
        let num = num.as_ref();
        num.trim() == num && !num.is_empty() && num.len() <= 128
    }
}

impl FromStr for SurveyNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SurveyNumber`")
    }
}

/// Geographic coordinates of a [`Land`].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coordinates {
    /// Latitude, in decimal degrees.
    pub latitude: Decimal,

    /// Longitude, in decimal degrees.
    pub longitude: Decimal,
}

define_kind! {
    #[doc = "Unit a [`Land`] area is measured in."]
    enum AreaUnit {
        #[doc = "Square feet."]
        Sqft = 1,

        #[doc = "Acres."]
        Acres = 2,

        #[doc = "Hectares."]
        Hectares = 3,
    }
}

define_kind! {
    #[doc = "Kind of a [`Land`]."]
    enum Kind {
        #[doc = "Residential plot."]
        Residential = 1,

        #[doc = "Commercial plot."]
        Commercial = 2,

        #[doc = "Agricultural field."]
        Agricultural = 3,

        #[doc = "Industrial site."]
        Industrial = 4,

        #[doc = "Mixed-use parcel."]
        Mixed = 5,
    }
}

define_kind! {
    #[doc = "Sale status of a [`Land`]."]
    enum Status {
        #[doc = "Open for sale."]
        Available = 1,

        #[doc = "Held by a partial payment."]
        Reserved = 2,

        #[doc = "Fully paid and sold."]
        Sold = 3,
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{customer, transaction::PaymentKind};

    use super::{AreaUnit, BusinessId, Kind, Land, Location, Status};

    fn land(status: Status) -> Land {
        Land {
            id: super::Id::new(),
            business_id: BusinessId::from_seq(1),
            location: Location::new("Whitefield, Bengaluru").unwrap(),
            area_size: Decimal::from(2400),
            area_unit: AreaUnit::Sqft,
            price: "4800000".parse::<Money>().unwrap(),
            survey_number: None,
            kind: Kind::Residential,
            status,
            description: None,
            documents: vec![],
            coordinates: None,
            purchased_by: None,
            primary_agent_id: None,
            created_at: DateTime::now(),
        }
    }

    #[test]
    fn formats_business_id() {
        assert_eq!(BusinessId::from_seq(1).to_string(), "LAND-00001");
        assert_eq!(BusinessId::from_seq(42).to_string(), "LAND-00042");
        assert_eq!(BusinessId::from_seq(123_456).to_string(), "LAND-123456");

        assert!(BusinessId::new("LAND-00042").is_some());
        assert!(BusinessId::new("LAND-42").is_none());
        assert!(BusinessId::new("CUST-00042").is_none());
    }

    #[test]
    fn full_payment_sells() {
        let buyer = customer::Id::new();
        for status in [Status::Available, Status::Reserved] {
            let mut land = land(status);
            land.apply_payment(PaymentKind::Full, buyer);
            assert_eq!(land.status, Status::Sold);
            assert_eq!(land.purchased_by, Some(buyer));
        }
    }

    #[test]
    fn partial_payment_reserves_available_only() {
        let buyer = customer::Id::new();

        let mut available = land(Status::Available);
        available.apply_payment(PaymentKind::Installment, buyer);
        assert_eq!(available.status, Status::Reserved);
        assert_eq!(available.purchased_by, None);

        let mut reserved = land(Status::Reserved);
        reserved.apply_payment(PaymentKind::Advance, buyer);
        assert_eq!(reserved.status, Status::Reserved);
        assert_eq!(reserved.purchased_by, None);

        let sold = {
            let mut l = land(Status::Sold);
            l.purchased_by = Some(customer::Id::new());
            l
        };
        let owner = sold.purchased_by;
        let mut sold_after = sold;
        sold_after.apply_payment(PaymentKind::Token, buyer);
        assert_eq!(sold_after.status, Status::Sold);
        assert_eq!(sold_after.purchased_by, owner);
    }
}
