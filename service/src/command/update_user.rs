//! [`Command`] for updating an existing [`User`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`User`].
///
/// Absent fields keep their current values. Credentials are never editable
/// this way.
#[derive(Clone, Debug, Default)]
pub struct UpdateUser {
    /// ID of the [`User`] to update.
    pub id: user::Id,

    /// New full name.
    pub full_name: Option<contact::Name>,

    /// New [`user::Role`].
    pub role: Option<user::Role>,

    /// New activity indicator.
    pub is_active: Option<bool>,
}

/// Output of [`UpdateUser`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`User`] as it was before the update.
    pub before: User,

    /// [`User`] as it is after the update.
    pub after: User,
}

impl<Db> Command<UpdateUser> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<User>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateUser {
            id,
            full_name,
            role,
            is_active,
        } = cmd;

        let before = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(id))
            .map_err(tracerr::wrap!())?;

        let mut after = before.clone();
        if let Some(v) = full_name {
            after.full_name = v;
        }
        if let Some(v) = role {
            after.role = v;
        }
        if let Some(v) = is_active {
            after.is_active = v;
        }

        self.database()
            .execute(Update(after.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { before, after })
    }
}

/// Error of [`UpdateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use common::{
        operations::{By, Select, Update},
        DateTime, Handler,
    };
    use futures::executor::block_on;
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use tracerr::Traced;

    use crate::{
        domain::{contact, user, User},
        infra::database,
        Command as _, Config, Service,
    };

    use super::UpdateUser;

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<Option<User>>>);

    impl Handler<Select<By<Option<User>, user::Id>>> for FakeDb {
        type Ok = Option<User>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<User>, user::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    impl Handler<Update<User>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(user): Update<User>,
        ) -> Result<(), Self::Err> {
            *self.0.lock().unwrap() = Some(user);
            Ok(())
        }
    }

    fn user() -> User {
        User {
            id: user::Id::new(),
            username: "asha.rao".parse().unwrap(),
            email: "asha@example.com".parse().unwrap(),
            password_hash: user::PasswordHash::new(
                &"secret-pass-1".parse::<user::Password>().unwrap(),
            )
            .unwrap(),
            full_name: contact::Name::new("Asha Rao").unwrap(),
            role: user::Role::Staff,
            is_active: true,
            last_login_at: None,
            created_at: DateTime::now(),
        }
    }

    fn service(db: FakeDb) -> Service<FakeDb> {
        Service::new(
            Config {
                jwt_encoding_key: EncodingKey::from_secret(b"secret"),
                jwt_decoding_key: DecodingKey::from_secret(b"secret"),
            },
            db,
        )
    }

    #[test]
    fn changes_role_and_deactivates() {
        let user = user();
        let db = FakeDb(Arc::new(Mutex::new(Some(user.clone()))));
        let service = service(db.clone());

        let output = block_on(service.execute(UpdateUser {
            id: user.id,
            role: Some(user::Role::Agent),
            is_active: Some(false),
            ..UpdateUser::default()
        }))
        .unwrap();

        assert_eq!(output.before.role, user::Role::Staff);
        assert_eq!(output.after.role, user::Role::Agent);
        assert!(!output.after.is_active);
        assert_eq!(output.after.username, user.username);
    }

    #[test]
    fn fails_on_missing_user() {
        let service = service(FakeDb::default());

        let result = block_on(service.execute(UpdateUser {
            id: user::Id::new(),
            is_active: Some(false),
            ..UpdateUser::default()
        }));

        assert!(result.is_err());
    }
}
