//! Date and time utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, ops, str::FromStr, time::Duration};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, Month, UtcOffset};

/// UTC date and time with a microsecond precision.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateTime(time::OffsetDateTime);

impl DateTime {
    /// A [`DateTime`] representing the Unix epoch.
    pub const UNIX_EPOCH: Self = Self(time::OffsetDateTime::UNIX_EPOCH);

    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self(
            inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        )
    }

    /// Creates a new [`DateTime`] from the provided [`UNIX_EPOCH`] timestamp.
    ///
    /// [`None`] is returned if the timestamp is invalid.
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn from_unix_timestamp(timestamp: i64) -> Option<Self> {
        time::OffsetDateTime::from_unix_timestamp(timestamp)
            .ok()
            .map(Self)
    }

    /// Returns the [`UNIX_EPOCH`] timestamp of this [`DateTime`].
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        time::OffsetDateTime::parse(input, &Rfc3339)
            .map(|dt| Self(dt.to_offset(UtcOffset::UTC)))
            .map_err(ParseError::DateTime)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Returns the calendar [`Date`] of this [`DateTime`].
    #[must_use]
    pub fn date(&self) -> Date {
        Date(self.0.date())
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl ops::Add<Duration> for DateTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl ops::Sub<Duration> for DateTime {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs)
    }
}

/// Calendar date without a time component.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] representing the current UTC date.
    #[must_use]
    pub fn today() -> Self {
        DateTime::now().date()
    }

    /// Returns this [`Date`] in the compact `YYYYMMDD` form.
    #[must_use]
    pub fn compact(&self) -> String {
        format!(
            "{:04}{:02}{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
        )
    }
}

impl fmt::Display for Date {
    /// Formats this [`Date`] as `YYYY-MM-DD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
        )
    }
}

impl FromStr for Date {
    type Err = ParseError;

    /// Parses a [`Date`] from its `YYYY-MM-DD` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseError as E;

        let mut parts = s.splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or(E::Date)?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(E::Date)?;
        let day = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or(E::Date)?;

        time::Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| E::Date)
    }
}

/// Error of parsing a [`DateTime`] or a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string as an [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[display("invalid RFC 3339 date and time: {_0}")]
    DateTime(time::error::Parse),

    /// Failed to parse the string as a `YYYY-MM-DD` date.
    #[display("invalid `YYYY-MM-DD` date")]
    Date,
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for DateTime {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::OffsetDateTime::from_sql(ty, raw)
            .map(|dt| Self(dt.to_offset(UtcOffset::UTC)))
    }
}

#[cfg(feature = "postgres")]
impl ToSql for DateTime {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::{Date, DateTime};

    impl serde::Serialize for DateTime {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_rfc3339())
        }
    }

    impl<'de> Deserialize<'de> for DateTime {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Self::from_rfc3339(&s).map_err(D::Error::custom)
        }
    }

    impl serde::Serialize for Date {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(D::Error::custom)
        }
    }
}

#[cfg(feature = "serde")]
pub mod unix_timestamp {
    //! Serialization of a [`DateTime`] as a Unix timestamp, for claims-style
    //! payloads.

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::DateTime;

    /// Serializes the [`DateTime`] as a Unix timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp is invalid.
    pub fn serialize<S>(
        dt: &DateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(dt.unix_timestamp())
    }

    /// Deserializes the Unix timestamp into a [`DateTime`].
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp is invalid.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        DateTime::from_unix_timestamp(i64::deserialize(deserializer)?)
            .ok_or_else(|| Error::custom("invalid timestamp"))
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::{Date, DateTime};

    #[test]
    fn date_roundtrip() {
        let date = Date::from_str("2024-03-07").unwrap();
        assert_eq!(date.to_string(), "2024-03-07");
        assert_eq!(date.compact(), "20240307");

        assert!(Date::from_str("2024-13-01").is_err());
        assert!(Date::from_str("2024-02-30").is_err());
        assert!(Date::from_str("yesterday").is_err());
    }

    #[test]
    fn datetime_rfc3339() {
        let dt = DateTime::from_rfc3339("2024-03-07T12:30:45Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-07T12:30:45Z");
        assert_eq!(dt.date(), Date::from_str("2024-03-07").unwrap());

        assert!(DateTime::from_rfc3339("2024-03-07").is_err());
    }
}
