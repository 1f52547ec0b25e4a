//! [`Command`] for creating a new [`User`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Password, Username};
use crate::{
    domain::{contact, user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Username`] of a new [`User`].
    pub username: user::Username,

    /// Email address of a new [`User`].
    pub email: contact::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// Full name of a new [`User`].
    pub full_name: contact::Name,

    /// [`user::Role`] of a new [`User`].
    ///
    /// Defaults to [`user::Role::Staff`] if omitted.
    pub role: Option<user::Role>,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'u> Database<
            Select<By<Option<User>, &'u user::Username>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'e> Database<
            Select<By<Option<User>, &'e contact::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            username,
            email,
            password,
            full_name,
            role,
        } = cmd;

        let u = self
            .database()
            .execute(Select(By::new(&username)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::UsernameOccupied(username)));
        }

        let u = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let password_hash = user::PasswordHash::new(password.expose_secret())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let user = User {
            id: user::Id::new(),
            username,
            email,
            password_hash,
            full_name,
            role: role.unwrap_or(user::Role::Staff),
            is_active: true,
            last_login_at: None,
            created_at: DateTime::now(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Email address is already occupied.
    #[display("`{_0}` email is occupied")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] contact::Email),

    /// [`Password`] hashing error.
    #[display("Failed to hash a `Password`: {_0}")]
    #[from]
    PasswordHash(bcrypt::BcryptError),

    /// [`user::Username`] is already occupied.
    #[display("`{_0}` username is occupied")]
    #[from(ignore)]
    UsernameOccupied(#[error(not(source))] user::Username),
}
