//! [`Context`]-related definitions.

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_client_ip::InsecureClientIp;
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service::{
    audit,
    command::{self, Command as _},
    domain::{activity, user, user::session, User},
};
use tokio::sync::OnceCell;

use crate::{define_error, AsError, Error, Service};

/// Application context of a single HTTP request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Parts of the HTTP request.
    parts: http::request::Parts,

    /// Currently authenticated [`User`].
    current_user: OnceCell<User>,

    /// Last authentication [`Error`].
    auth_error: OnceCell<Error>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`User`] authenticated by the current HTTP request.
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request is not authorized;
    /// - the provided authentication token is invalid.
    pub async fn current_user(&self) -> Result<User, Error> {
        self.current_user
            .get_or_try_init(|| async {
                match self
                    .auth_error
                    .get_or_try_init(|| async {
                        match self.do_authentication().await {
                            Ok(u) => Err(u),
                            Err(e) => Ok(e),
                        }
                    })
                    .await
                {
                    Ok(e) => Err(e),
                    Err(u) => Ok(u),
                }
            })
            .await
            .cloned()
            .map_err(Clone::clone)
    }

    /// Returns the current [`User`] if their [`user::Role`] passes the
    /// provided check.
    ///
    /// # Errors
    ///
    /// Errors if the request is not authenticated, or the [`user::Role`]
    /// fails the check.
    pub async fn authorize(
        &self,
        allowed: impl FnOnce(user::Role) -> bool,
    ) -> Result<User, Error> {
        let user = self.current_user().await?;
        if allowed(user.role) {
            Ok(user)
        } else {
            Err(AuthError::AccessDenied.into())
        }
    }

    /// Returns the client IP address of the current HTTP request.
    #[must_use]
    pub fn client_ip(&self) -> Option<String> {
        InsecureClientIp::from(&self.parts.headers, &self.parts.extensions)
            .map(|ip| ip.0.to_string())
            .ok()
    }

    /// Returns the `User-Agent` header of the current HTTP request.
    #[must_use]
    pub fn user_agent(&self) -> Option<String> {
        self.parts
            .headers
            .get(http::header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(ToOwned::to_owned)
    }

    /// Records the performed action in the activity log on behalf of the
    /// `actor`, attaching the request context.
    ///
    /// Never fails: audit storage errors are swallowed by the [`Service`].
    pub async fn audit(
        &self,
        actor: &User,
        action: activity::Action,
        entity: activity::Entity,
        entity_id: Option<String>,
        description: String,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) {
        self.service
            .audit(audit::Entry {
                user_id: actor.id,
                action,
                entity,
                entity_id,
                description,
                old_values,
                new_values,
                ip_address: self.client_ip(),
                user_agent: self.user_agent(),
            })
            .await;
    }

    /// Performs the authentication of the current HTTP request.
    ///
    /// # Errors
    ///
    /// Errors if the provided authentication token is invalid.
    async fn do_authentication(&self) -> Result<User, Error> {
        let res = self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await;
        match res {
            Ok(TypedHeader(Authorization(bearer))) => {
                #[expect(unsafe_code, reason = "specified in correct header")]
                let token = unsafe {
                    session::Token::new_unchecked(bearer.token().to_owned())
                };
                self.service
                    .execute(command::AuthorizeUserSession { token })
                    .await
                    .map_err(AsError::into_error)
            }
            Err(e) => {
                if e.is_missing() {
                    Err(AuthError::AuthorizationRequired.into())
                } else {
                    Err(e.into_error())
                }
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                Error::internal(&"missing `Service` extension")
            })?;

        Ok(Self {
            service,
            parts: parts.clone(),
            current_user: OnceCell::new(),
            auth_error: OnceCell::new(),
        })
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::authorize_user_session::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::JsonWebTokenDecodeError(_) | E::UserNotExists(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
            E::UserInactive(_) => Some(AuthError::AccessDenied.into()),
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,

        #[code = "ACCESS_DENIED"]
        #[status = FORBIDDEN]
        #[message = "Access denied"]
        AccessDenied,
    }
}
