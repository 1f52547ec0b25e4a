//! [`User`] management API definitions.
//!
//! [`User`]: service::domain::User

use axum::{
    extract::{Path, Query},
    response::Response,
    Json,
};
use serde::Deserialize;
use service::{
    command,
    domain::{activity, contact, user},
    query, read, Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Query parameters of the [`list`] handler.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListParams {
    /// 1-based number of the requested page.
    pub page: Option<u32>,

    /// Maximum number of items on the requested page.
    pub limit: Option<u32>,

    /// Order of items on the requested page.
    pub order: Option<api::Order>,

    /// Term to fuzzy search for.
    pub search: Option<String>,

    /// Role to filter by.
    pub role: Option<user::Role>,

    /// Active flag to filter by.
    pub is_active: Option<bool>,
}

/// Lists [`User`] accounts matching the provided filters.
///
/// Available to administrators only.
///
/// [`User`]: service::domain::User
///
/// # Errors
///
/// Errors if the request is not authorized.
pub async fn list(
    context: Context,
    Query(params): Query<ListParams>,
) -> Result<Response, Error> {
    _ = context.authorize(user::Role::is_admin).await?;

    let ListParams {
        page,
        limit,
        order,
        search,
        role,
        is_active,
    } = params;

    let selector = read::user::list::Selector {
        arguments: api::arguments(page, limit, order),
        filter: read::user::list::Filter {
            search,
            role,
            is_active,
        },
    };
    let page = context
        .service()
        .execute(query::user::List::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::paginated::<_, api::auth::User>(page))
}

/// Returns a single [`User`] account by its ID.
///
/// Available to administrators only.
///
/// # Errors
///
/// Errors if the request is not authorized, or no such [`User`] exists.
///
/// [`User`]: service::domain::User
pub async fn single(
    context: Context,
    Path(id): Path<user::Id>,
) -> Result<Response, Error> {
    _ = context.authorize(user::Role::is_admin).await?;

    let user = context
        .service()
        .execute(query::user::Single::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(UserError::NotFound)?;

    Ok(api::ok(api::auth::User::from(user)))
}

/// Body of the [`update`] handler.
///
/// Absent fields keep their current values.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateRequest {
    /// New full name.
    pub full_name: Option<String>,

    /// New role.
    pub role: Option<user::Role>,

    /// New activity indicator.
    pub is_active: Option<bool>,
}

/// Updates an existing [`User`] account: full name, role or activation.
///
/// Available to administrators only.
///
/// # Errors
///
/// Errors if the request is not authorized, the body is invalid, or no such
/// [`User`] exists.
///
/// [`User`]: service::domain::User
pub async fn update(
    context: Context,
    Path(id): Path<user::Id>,
    Json(req): Json<UpdateRequest>,
) -> Result<Response, Error> {
    let actor = context.authorize(user::Role::is_admin).await?;

    let full_name = req
        .full_name
        .map(|n| n.parse::<contact::Name>())
        .transpose()
        .map_err(api::invalid("full_name"))?;

    let output = context
        .service()
        .execute(command::UpdateUser {
            id,
            full_name,
            role: req.role,
            is_active: req.is_active,
        })
        .await
        .map_err(AsError::into_error)?;

    let before = api::auth::User::from(output.before);
    let after = api::auth::User::from(output.after);
    context
        .audit(
            &actor,
            activity::Action::Update,
            activity::Entity::User,
            Some(after.username.to_string()),
            format!("Updated `User` {}", after.username),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&after).ok(),
        )
        .await;

    Ok(api::ok(after))
}

impl AsError for command::update_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_user::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::UserNotExists(_) => Some(UserError::NotFound.into()),
        }
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`User` not found"]
        NotFound,
    }
}
