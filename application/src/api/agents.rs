//! [`Agent`]-related API definitions.
//!
//! [`Agent`]: domain::Agent

use axum::{
    extract::{Path, Query},
    response::Response,
    Json,
};
use common::{Date, DateTime, Money, Percent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, activity, agent, contact, user},
    query, read, Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Serialized representation of a [`domain::Agent`].
#[derive(Clone, Debug, Serialize)]
pub struct Agent {
    /// ID of this [`Agent`].
    pub id: agent::Id,

    /// Human-facing identifier of this [`Agent`].
    pub business_id: agent::BusinessId,

    /// Name of this [`Agent`].
    pub name: contact::Name,

    /// Phone number of this [`Agent`].
    pub phone: contact::Phone,

    /// Email address of this [`Agent`].
    pub email: Option<contact::Email>,

    /// Postal address of this [`Agent`].
    pub address: Option<String>,

    /// Commission rate of this [`Agent`].
    pub commission_percent: Percent,

    /// Date this [`Agent`] joined on.
    pub joining_date: Date,

    /// Indicator whether this [`Agent`] is active.
    pub is_active: bool,

    /// Number of sales recorded through this [`Agent`].
    pub total_sales: i32,

    /// Total commission earned by this [`Agent`].
    pub total_commission_earned: Money,

    /// Name of the bank this [`Agent`] is paid through.
    pub bank_name: Option<String>,

    /// Bank account number of this [`Agent`].
    pub bank_account: Option<String>,

    /// IFSC code of the [`Agent`]'s bank branch.
    pub bank_ifsc: Option<String>,

    /// Free-form notes about this [`Agent`].
    pub notes: Option<String>,

    /// When this [`Agent`] was created.
    pub created_at: DateTime,
}

impl From<domain::Agent> for Agent {
    fn from(a: domain::Agent) -> Self {
        Self {
            id: a.id,
            business_id: a.business_id,
            name: a.name,
            phone: a.phone,
            email: a.email,
            address: a.address,
            commission_percent: a.commission_percent,
            joining_date: a.joining_date,
            is_active: a.is_active,
            total_sales: a.total_sales,
            total_commission_earned: a.total_commission_earned,
            bank_name: a.bank_name,
            bank_account: a.bank_account,
            bank_ifsc: a.bank_ifsc,
            notes: a.notes,
            created_at: a.created_at,
        }
    }
}

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

    /// Active flag to filter by.
    pub is_active: Option<bool>,
}

/// Lists [`Agent`]s matching the provided filters.
///
/// # Errors
///
/// Errors if the request is not authenticated.
pub async fn list(
    context: Context,
    Query(params): Query<ListParams>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let ListParams {
        page,
        limit,
        order,
        search,
        is_active,
    } = params;

    let selector = read::agent::list::Selector {
        arguments: api::arguments(page, limit, order),
        filter: read::agent::list::Filter { search, is_active },
    };
    let page = context
        .service()
        .execute(query::agents::List::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::paginated::<_, Agent>(page))
}

/// Returns a single [`Agent`] by its ID.
///
/// # Errors
///
/// Errors if the request is not authenticated, or no such [`Agent`] exists.
pub async fn single(
    context: Context,
    Path(id): Path<agent::Id>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let agent = context
        .service()
        .execute(query::agents::Single::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(AgentError::NotFound)?;

    Ok(api::ok(Agent::from(agent)))
}

/// Body of the [`create`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRequest {
    /// Name of the new agent.
    pub name: String,

    /// Phone number of the new agent.
    pub phone: String,

    /// Email address of the new agent.
    pub email: Option<String>,

    /// Postal address of the new agent.
    pub address: Option<String>,

    /// Commission rate of the new agent.
    pub commission_percent: Decimal,

    /// Date the new agent joined on.
    pub joining_date: Date,

    /// Name of the bank the new agent is paid through.
    pub bank_name: Option<String>,

    /// Bank account number of the new agent.
    pub bank_account: Option<String>,

    /// IFSC code of the new agent's bank branch.
    pub bank_ifsc: Option<String>,

    /// Free-form notes about the new agent.
    pub notes: Option<String>,
}

/// Creates a new [`Agent`].
///
/// # Errors
///
/// Errors if the request is not authorized, or the body is invalid.
pub async fn create(
    context: Context,
    Json(req): Json<CreateRequest>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::is_admin).await?;

    let name = req
        .name
        .parse::<contact::Name>()
        .map_err(api::invalid("name"))?;
    let phone = req
        .phone
        .parse::<contact::Phone>()
        .map_err(api::invalid("phone"))?;
    let email = req
        .email
        .map(|e| e.parse::<contact::Email>())
        .transpose()
        .map_err(api::invalid("email"))?;
    let commission_percent = Percent::new(req.commission_percent)
        .ok_or("must be between 0 and 100")
        .map_err(api::invalid("commission_percent"))?;

    let agent = context
        .service()
        .execute(command::CreateAgent {
            name,
            phone,
            email,
            address: req.address,
            commission_percent,
            joining_date: req.joining_date,
            bank_name: req.bank_name,
            bank_account: req.bank_account,
            bank_ifsc: req.bank_ifsc,
            notes: req.notes,
        })
        .await
        .map_err(AsError::into_error)?;

    let dto = Agent::from(agent);
    context
        .audit(
            &user,
            activity::Action::Create,
            activity::Entity::Agent,
            Some(dto.business_id.to_string()),
            format!("Created `Agent` {}", dto.business_id),
            None,
            serde_json::to_value(&dto).ok(),
        )
        .await;

    Ok(api::created(dto))
}

/// Body of the [`update`] handler.
///
/// Absent fields keep their current values.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateRequest {
    /// New name.
    pub name: Option<String>,

    /// New phone number.
    pub phone: Option<String>,

    /// New email address.
    pub email: Option<String>,

    /// New postal address.
    pub address: Option<String>,

    /// New commission rate.
    pub commission_percent: Option<Decimal>,

    /// New joining date.
    pub joining_date: Option<Date>,

    /// New activity indicator.
    pub is_active: Option<bool>,

    /// New bank name.
    pub bank_name: Option<String>,

    /// New bank account number.
    pub bank_account: Option<String>,

    /// New IFSC code.
    pub bank_ifsc: Option<String>,

    /// New free-form notes.
    pub notes: Option<String>,
}

/// Updates an existing [`Agent`].
///
/// # Errors
///
/// Errors if the request is not authorized, the body is invalid, or no such
/// [`Agent`] exists.
pub async fn update(
    context: Context,
    Path(id): Path<agent::Id>,
    Json(req): Json<UpdateRequest>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::is_admin).await?;

    let name = req
        .name
        .map(|n| n.parse::<contact::Name>())
        .transpose()
        .map_err(api::invalid("name"))?;
    let phone = req
        .phone
        .map(|p| p.parse::<contact::Phone>())
        .transpose()
        .map_err(api::invalid("phone"))?;
    let email = req
        .email
        .map(|e| e.parse::<contact::Email>())
        .transpose()
        .map_err(api::invalid("email"))?;
    let commission_percent = req
        .commission_percent
        .map(|p| Percent::new(p).ok_or("must be between 0 and 100"))
        .transpose()
        .map_err(api::invalid("commission_percent"))?;

    let output = context
        .service()
        .execute(command::UpdateAgent {
            id,
            name,
            phone,
            email,
            address: req.address,
            commission_percent,
            joining_date: req.joining_date,
            is_active: req.is_active,
            bank_name: req.bank_name,
            bank_account: req.bank_account,
            bank_ifsc: req.bank_ifsc,
            notes: req.notes,
        })
        .await
        .map_err(AsError::into_error)?;

    let before = Agent::from(output.before);
    let after = Agent::from(output.after);
    context
        .audit(
            &user,
            activity::Action::Update,
            activity::Entity::Agent,
            Some(after.business_id.to_string()),
            format!("Updated `Agent` {}", after.business_id),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&after).ok(),
        )
        .await;

    Ok(api::ok(after))
}

/// Deletes an existing [`Agent`].
///
/// # Errors
///
/// Errors if the request is not authorized, no such [`Agent`] exists, or the
/// [`Agent`] still has active assignments.
pub async fn delete(
    context: Context,
    Path(id): Path<agent::Id>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::is_admin).await?;

    let agent = context
        .service()
        .execute(command::DeleteAgent { id })
        .await
        .map_err(AsError::into_error)?;

    let dto = Agent::from(agent);
    context
        .audit(
            &user,
            activity::Action::Delete,
            activity::Entity::Agent,
            Some(dto.business_id.to_string()),
            format!("Deleted `Agent` {}", dto.business_id),
            serde_json::to_value(&dto).ok(),
            None,
        )
        .await;

    Ok(api::ok(dto))
}

impl AsError for command::create_agent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_agent::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_agent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_agent::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::AgentNotExists(_) => Some(AgentError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_agent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::delete_agent::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::AgentHasActiveAssignments(_) => {
                Some(AgentError::HasActiveAssignments.into())
            }
            E::AgentNotExists(_) => Some(AgentError::NotFound.into()),
        }
    }
}

define_error! {
    enum AgentError {
        #[code = "AGENT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Agent` not found"]
        NotFound,

        #[code = "AGENT_HAS_ACTIVE_ASSIGNMENTS"]
        #[status = CONFLICT]
        #[message = "`Agent` still has active assignments"]
        HasActiveAssignments,
    }
}
