//! [`User`] definitions.

pub mod session;

use std::{str::FromStr, sync::LazyLock};

use common::{define_kind, DateTime};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact;

pub use self::session::Session;

/// Account of a person operating the system.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Username`] of this [`User`].
    pub username: Username,

    /// Email address of this [`User`].
    pub email: contact::Email,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// Full name of this [`User`].
    pub full_name: contact::Name,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// Indicator whether this [`User`] is active.
    pub is_active: bool,

    /// [`DateTime`] when this [`User`] last logged in.
    pub last_login_at: Option<DateTime>,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: DateTime,
}

/// ID of a [`User`].
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

/// Username of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `username` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Creates a new [`Username`] if the given `username` is valid.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into();
        Self::check(&username).then_some(Self(username))
    }

    /// Checks whether the given `username` is a valid [`Username`].
    fn check(username: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Username`] invariants:
        /// - Must be between 3 and 30 characters long;
        /// - Must contain letters, digits, `.`, `_` or `-` only.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[\p{L}\p{N}._-]{3,30}$").expect("valid regex")
        });

        REGEX.is_match(username.as_ref())
    }
}

impl FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Username`")
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `password` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.len() >= 6 && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Password hash of a [`User`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Creates a new [`PasswordHash`] from the given [`Password`].
    ///
    /// # Errors
    ///
    /// If the hashing itself fails.
    pub fn new(password: &Password) -> Result<Self, bcrypt::BcryptError> {
        bcrypt::hash(&password.0, bcrypt::DEFAULT_COST).map(Self)
    }

    /// Verifies the given [`Password`] against this [`PasswordHash`].
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        bcrypt::verify(&password.0, &self.0).unwrap_or(false)
    }
}

define_kind! {
    #[doc = "Role of a [`User`]."]
    enum Role {
        #[doc = "Administrator with full access."]
        Admin = 1,

        #[doc = "Sales agent account."]
        Agent = 2,

        #[doc = "Office staff account."]
        Staff = 3,
    }
}

impl Role {
    /// Indicates whether this [`Role`] may manage [`User`] accounts and
    /// [`Agent`] records.
    ///
    /// [`Agent`]: crate::domain::Agent
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Indicates whether this [`Role`] may create and update [`Land`],
    /// [`Customer`] and [`Transaction`] records.
    ///
    /// [`Customer`]: crate::domain::Customer
    /// [`Land`]: crate::domain::Land
    /// [`Transaction`]: crate::domain::Transaction
    #[must_use]
    pub const fn may_edit_records(self) -> bool {
        matches!(self, Self::Admin | Self::Agent | Self::Staff)
    }

    /// Indicates whether this [`Role`] may delete records and run
    /// sensitive workflows.
    #[must_use]
    pub const fn may_delete_records(self) -> bool {
        matches!(self, Self::Admin | Self::Agent)
    }
}

#[cfg(test)]
mod spec {
    use super::{Password, PasswordHash, Role, Username};

    #[test]
    fn validates_username() {
        assert!(Username::new("rajesh.kumar").is_some());
        assert!(Username::new("agent_01").is_some());

        assert!(Username::new("ab").is_none());
        assert!(Username::new("with space").is_none());
    }

    #[test]
    fn hashes_and_verifies_password() {
        let password = Password::new("s3cret-pass").unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert!(hash.verify(&password));
        assert!(!hash.verify(&Password::new("wrong-pass").unwrap()));
    }

    #[test]
    fn role_gates() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Agent.is_admin());
        assert!(!Role::Staff.is_admin());

        assert!(Role::Staff.may_edit_records());
        assert!(!Role::Staff.may_delete_records());
        assert!(Role::Agent.may_delete_records());
    }
}
