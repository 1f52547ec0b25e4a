//! Authentication API definitions.

use axum::{response::Response, Json};
use common::DateTime;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, activity, contact, user},
    Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Serialized representation of a [`domain::User`].
///
/// Never exposes the password hash.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: user::Id,

    /// Username of this [`User`].
    pub username: user::Username,

    /// Email address of this [`User`].
    pub email: contact::Email,

    /// Full name of this [`User`].
    pub full_name: contact::Name,

    /// Role of this [`User`].
    pub role: user::Role,

    /// Indicator whether this [`User`] is active.
    pub is_active: bool,

    /// When this [`User`] last logged in.
    pub last_login_at: Option<DateTime>,

    /// When this [`User`] was created.
    pub created_at: DateTime,
}

impl From<domain::User> for User {
    fn from(u: domain::User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            is_active: u.is_active,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
        }
    }
}

/// Body of the [`signup`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct SignupRequest {
    /// Username of the new user.
    pub username: String,

    /// Email address of the new user.
    pub email: String,

    /// Password of the new user.
    pub password: String,

    /// Full name of the new user.
    pub full_name: String,

    /// Role of the new user.
    ///
    /// Only an administrator may specify a role other than staff.
    pub role: Option<user::Role>,
}

/// Registers a new [`User`].
///
/// Open to unauthenticated callers, which always get the staff role.
///
/// # Errors
///
/// Errors if the body is invalid, or the username or email is occupied.
pub async fn signup(
    context: Context,
    Json(req): Json<SignupRequest>,
) -> Result<Response, Error> {
    let username = req
        .username
        .parse::<user::Username>()
        .map_err(api::invalid("username"))?;
    let email = req
        .email
        .parse::<contact::Email>()
        .map_err(api::invalid("email"))?;
    let password = req
        .password
        .parse::<user::Password>()
        .map_err(api::invalid("password"))?;
    let full_name = req
        .full_name
        .parse::<contact::Name>()
        .map_err(api::invalid("full_name"))?;

    let role = match req.role {
        Some(role) if role != user::Role::Staff => {
            context.authorize(user::Role::is_admin).await.map(drop)?;
            Some(role)
        }
        other => other,
    };

    let user = context
        .service()
        .execute(command::CreateUser {
            username,
            email,
            password: SecretBox::new(Box::new(password)),
            full_name,
            role,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(api::created(User::from(user)))
}

/// Body of the [`login`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    /// Username to log in with.
    pub username: String,

    /// Password to log in with.
    pub password: String,
}

/// Logs a [`User`] in, issuing a session token.
///
/// # Errors
///
/// Errors if the credentials are wrong, or the [`User`] is inactive.
pub async fn login(
    context: Context,
    Json(req): Json<LoginRequest>,
) -> Result<Response, Error> {
    let username = req
        .username
        .parse::<user::Username>()
        .map_err(|_| Error::from(AuthError::WrongCredentials))?;
    let password = req
        .password
        .parse::<user::Password>()
        .map_err(|_| Error::from(AuthError::WrongCredentials))?;

    let output = context
        .service()
        .execute(command::CreateUserSession::ByCredentials {
            username,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)?;

    context
        .audit(
            &output.user,
            activity::Action::Login,
            activity::Entity::User,
            Some(output.user.username.to_string()),
            format!("`User` {} logged in", output.user.username),
            None,
            None,
        )
        .await;

    Ok(api::ok(serde_json::json!({
        "token": output.token.to_string(),
        "user": User::from(output.user),
        "expires_at": output.expires_at,
    })))
}

/// Returns the currently authenticated [`User`].
///
/// # Errors
///
/// Errors if the request is not authenticated.
pub async fn me(context: Context) -> Result<Response, Error> {
    let user = context.current_user().await?;

    Ok(api::ok(User::from(user)))
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_user::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::EmailOccupied(_) => Some(AuthError::EmailOccupied.into()),
            E::PasswordHash(_) => None,
            E::UsernameOccupied(_) => {
                Some(AuthError::UsernameOccupied.into())
            }
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_user_session::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::JsonWebTokenEncodeError(_) => None,
            E::UserInactive(_) => Some(AuthError::UserInactive.into()),
            E::UserNotExists(_) | E::WrongCredentials => {
                Some(AuthError::WrongCredentials.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Wrong username or password"]
        WrongCredentials,

        #[code = "USER_INACTIVE"]
        #[status = FORBIDDEN]
        #[message = "`User` account is deactivated"]
        UserInactive,

        #[code = "USERNAME_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "`Username` is already taken"]
        UsernameOccupied,

        #[code = "EMAIL_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Email address is already taken"]
        EmailOccupied,
    }
}
