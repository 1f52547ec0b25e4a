//! Domain definitions.

pub mod activity;
pub mod agent;
pub mod assignment;
pub mod contact;
pub mod customer;
pub mod land;
pub mod transaction;
pub mod user;

use std::str::FromStr;

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

pub use self::{
    agent::Agent, assignment::Assignment, customer::Customer, land::Land,
    transaction::Transaction, user::User,
};

/// Reference to an externally stored file.
///
/// Only the reference string is kept here; the binary content lives in an
/// external storage.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str, String)]
#[serde(try_from = "String", into = "String")]
pub struct FileRef(String);

impl FileRef {
    /// Creates a new [`FileRef`] if the given `reference` is valid.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        Self::check(&reference).then_some(Self(reference))
    }

    /// Checks whether the given `reference` is a valid [`FileRef`].
    fn check(reference: impl AsRef<str>) -> bool {
        let reference = reference.as_ref();
        reference.trim() == reference
            && !reference.is_empty()
            && reference.len() <= 1024
    }
}

impl FromStr for FileRef {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FileRef`")
    }
}

impl TryFrom<String> for FileRef {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `FileRef`")
    }
}

impl From<FileRef> for String {
    fn from(r: FileRef) -> Self {
        r.0
    }
}
