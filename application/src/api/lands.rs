//! [`Land`]-related API definitions.
//!
//! [`Land`]: domain::Land

use axum::{
    extract::{Path, Query},
    response::Response,
    Json,
};
use common::{DateTime, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, activity, agent, assignment, customer, land, user, FileRef},
    query, Command as _,
};

use crate::{api, define_error, AsError, Context, Error, Violation};

/// Serialized representation of a [`domain::Land`].
#[derive(Clone, Debug, Serialize)]
pub struct Land {
    /// ID of this [`Land`].
    pub id: land::Id,

    /// Human-facing identifier of this [`Land`].
    pub business_id: land::BusinessId,

    /// Location of this [`Land`].
    pub location: land::Location,

    /// Size of the area of this [`Land`].
    pub area_size: Decimal,

    /// Unit the area is measured in.
    pub area_unit: land::AreaUnit,

    /// Asking price for this [`Land`].
    pub price: Money,

    /// Survey number of this [`Land`], if registered.
    pub survey_number: Option<land::SurveyNumber>,

    /// Kind of this [`Land`].
    pub kind: land::Kind,

    /// Sale status of this [`Land`].
    pub status: land::Status,

    /// Free-form description of this [`Land`].
    pub description: Option<String>,

    /// References to documents attached to this [`Land`].
    pub documents: Vec<FileRef>,

    /// Geographic coordinates of this [`Land`], if surveyed.
    pub coordinates: Option<land::Coordinates>,

    /// Customer who purchased this [`Land`], if sold.
    pub purchased_by: Option<customer::Id>,

    /// Primary agent assigned to this [`Land`].
    pub primary_agent_id: Option<agent::Id>,

    /// When this [`Land`] was created.
    pub created_at: DateTime,
}

impl From<domain::Land> for Land {
    fn from(land: domain::Land) -> Self {
        Self {
            id: land.id,
            business_id: land.business_id,
            location: land.location,
            area_size: land.area_size,
            area_unit: land.area_unit,
            price: land.price,
            survey_number: land.survey_number,
            kind: land.kind,
            status: land.status,
            description: land.description,
            documents: land.documents,
            coordinates: land.coordinates,
            purchased_by: land.purchased_by,
            primary_agent_id: land.primary_agent_id,
            created_at: land.created_at,
        }
    }
}

/// Serialized representation of a [`domain::Assignment`].
#[derive(Clone, Debug, Serialize)]
pub struct Assignment {
    /// ID of this [`Assignment`].
    pub id: assignment::Id,

    /// ID of the assigned land.
    pub land_id: land::Id,

    /// ID of the assigned agent.
    pub agent_id: agent::Id,

    /// Date the assignment was made on.
    pub assigned_on: common::Date,

    /// Status of this [`Assignment`].
    pub status: assignment::Status,

    /// Free-form notes about this [`Assignment`].
    pub notes: Option<String>,
}

impl From<domain::Assignment> for Assignment {
    fn from(a: domain::Assignment) -> Self {
        Self {
            id: a.id,
            land_id: a.land_id,
            agent_id: a.agent_id,
            assigned_on: a.assigned_on,
            status: a.status,
            notes: a.notes,
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

    /// Sale status to filter by.
    pub status: Option<land::Status>,

    /// Land kind to filter by.
    pub kind: Option<land::Kind>,

    /// Minimum asking price.
    pub min_price: Option<Decimal>,

    /// Maximum asking price.
    pub max_price: Option<Decimal>,

    /// Primary agent to filter by.
    pub agent_id: Option<agent::Id>,
}

/// Lists [`Land`]s matching the provided filters.
///
/// # Errors
///
/// Errors if the request is not authenticated, or the filters are invalid.
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
        status,
        kind,
        min_price,
        max_price,
        agent_id,
    } = params;

    let min_price = min_price
        .map(|d| Money::new(d).ok_or("cannot be negative"))
        .transpose()
        .map_err(api::invalid("min_price"))?;
    let max_price = max_price
        .map(|d| Money::new(d).ok_or("cannot be negative"))
        .transpose()
        .map_err(api::invalid("max_price"))?;

    let selector = service::read::land::list::Selector {
        arguments: api::arguments(page, limit, order),
        filter: service::read::land::list::Filter {
            search,
            status,
            kind,
            min_price,
            max_price,
            agent_id,
        },
    };
    let page = context
        .service()
        .execute(query::lands::List::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::paginated::<_, Land>(page))
}

/// Returns a single [`Land`] by its ID.
///
/// # Errors
///
/// Errors if the request is not authenticated, or no such [`Land`] exists.
pub async fn single(
    context: Context,
    Path(id): Path<land::Id>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let land = context
        .service()
        .execute(query::lands::Single::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(LandError::NotFound)?;

    Ok(api::ok(Land::from(land)))
}

/// Returns aggregated [`Land`] counters.
///
/// # Errors
///
/// Errors if the request is not authenticated.
pub async fn stats(context: Context) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let stats = context
        .service()
        .execute(query::lands::Stats::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::ok(serde_json::json!({
        "available": stats.available,
        "reserved": stats.reserved,
        "sold": stats.sold,
        "total": stats.total(),
        "total_value": stats.total_value,
        "sold_value": stats.sold_value,
    })))
}

/// Body of the [`create`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRequest {
    /// Location of the new land.
    pub location: String,

    /// Size of the area of the new land.
    pub area_size: Decimal,

    /// Unit the area is measured in.
    pub area_unit: land::AreaUnit,

    /// Asking price for the new land.
    pub price: Decimal,

    /// Survey number of the new land.
    pub survey_number: Option<String>,

    /// Kind of the new land.
    pub kind: land::Kind,

    /// Free-form description of the new land.
    pub description: Option<String>,

    /// References to documents attached to the new land.
    #[serde(default)]
    pub documents: Vec<String>,

    /// Geographic coordinates of the new land.
    pub coordinates: Option<land::Coordinates>,

    /// Primary agent assigned to the new land.
    pub primary_agent_id: Option<agent::Id>,
}

/// Creates a new [`Land`].
///
/// # Errors
///
/// Errors if the request is not authorized, or the body is invalid.
pub async fn create(
    context: Context,
    Json(req): Json<CreateRequest>,
) -> Result<Response, Error> {
    let user = context
        .authorize(user::Role::may_edit_records)
        .await?;

    let location = req
        .location
        .parse::<land::Location>()
        .map_err(api::invalid("location"))?;
    let price =
        Money::new(req.price).ok_or("cannot be negative")
            .map_err(api::invalid("price"))?;
    let survey_number = req
        .survey_number
        .map(|s| s.parse::<land::SurveyNumber>())
        .transpose()
        .map_err(api::invalid("survey_number"))?;
    let documents = req
        .documents
        .into_iter()
        .map(|d| d.parse::<FileRef>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(api::invalid("documents"))?;

    let land = context
        .service()
        .execute(command::CreateLand {
            location,
            area_size: req.area_size,
            area_unit: req.area_unit,
            price,
            survey_number,
            kind: req.kind,
            description: req.description,
            documents,
            coordinates: req.coordinates,
            primary_agent_id: req.primary_agent_id,
        })
        .await
        .map_err(AsError::into_error)?;

    let dto = Land::from(land);
    context
        .audit(
            &user,
            activity::Action::Create,
            activity::Entity::Land,
            Some(dto.business_id.to_string()),
            format!("Created `Land` {}", dto.business_id),
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
    /// New location.
    pub location: Option<String>,

    /// New area size.
    pub area_size: Option<Decimal>,

    /// New area unit.
    pub area_unit: Option<land::AreaUnit>,

    /// New asking price.
    pub price: Option<Decimal>,

    /// New survey number.
    pub survey_number: Option<String>,

    /// New kind.
    pub kind: Option<land::Kind>,

    /// New sale status.
    pub status: Option<land::Status>,

    /// New description.
    pub description: Option<String>,

    /// New document references.
    pub documents: Option<Vec<String>>,

    /// New geographic coordinates.
    pub coordinates: Option<land::Coordinates>,

    /// New primary agent.
    pub primary_agent_id: Option<agent::Id>,
}

/// Updates an existing [`Land`].
///
/// # Errors
///
/// Errors if the request is not authorized, the body is invalid, or no such
/// [`Land`] exists.
pub async fn update(
    context: Context,
    Path(id): Path<land::Id>,
    Json(req): Json<UpdateRequest>,
) -> Result<Response, Error> {
    let user = context
        .authorize(user::Role::may_edit_records)
        .await?;

    let location = req
        .location
        .map(|s| s.parse::<land::Location>())
        .transpose()
        .map_err(api::invalid("location"))?;
    let price = req
        .price
        .map(|d| Money::new(d).ok_or("cannot be negative"))
        .transpose()
        .map_err(api::invalid("price"))?;
    let survey_number = req
        .survey_number
        .map(|s| s.parse::<land::SurveyNumber>())
        .transpose()
        .map_err(api::invalid("survey_number"))?;
    let documents = req
        .documents
        .map(|ds| {
            ds.into_iter()
                .map(|d| d.parse::<FileRef>())
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
        .map_err(api::invalid("documents"))?;

    let output = context
        .service()
        .execute(command::UpdateLand {
            id,
            location,
            area_size: req.area_size,
            area_unit: req.area_unit,
            price,
            survey_number,
            kind: req.kind,
            status: req.status,
            description: req.description,
            documents,
            coordinates: req.coordinates,
            primary_agent_id: req.primary_agent_id,
        })
        .await
        .map_err(AsError::into_error)?;

    let before = Land::from(output.before);
    let after = Land::from(output.after);
    context
        .audit(
            &user,
            activity::Action::Update,
            activity::Entity::Land,
            Some(after.business_id.to_string()),
            format!("Updated `Land` {}", after.business_id),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&after).ok(),
        )
        .await;

    Ok(api::ok(after))
}

/// Deletes an existing [`Land`].
///
/// # Errors
///
/// Errors if the request is not authorized, no such [`Land`] exists, or the
/// [`Land`] is referenced by transactions.
pub async fn delete(
    context: Context,
    Path(id): Path<land::Id>,
) -> Result<Response, Error> {
    let user = context
        .authorize(user::Role::may_delete_records)
        .await?;

    let land = context
        .service()
        .execute(command::DeleteLand { id })
        .await
        .map_err(AsError::into_error)?;

    let dto = Land::from(land);
    context
        .audit(
            &user,
            activity::Action::Delete,
            activity::Entity::Land,
            Some(dto.business_id.to_string()),
            format!("Deleted `Land` {}", dto.business_id),
            serde_json::to_value(&dto).ok(),
            None,
        )
        .await;

    Ok(api::ok(dto))
}

/// Body of the [`mark_sold`] handler.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct MarkSoldRequest {
    /// ID of the buying customer, if known.
    pub purchased_by: Option<customer::Id>,
}

/// Administratively marks a [`Land`] as sold.
///
/// # Errors
///
/// Errors if the request is not authorized, or no such [`Land`] exists.
pub async fn mark_sold(
    context: Context,
    Path(id): Path<land::Id>,
    Json(req): Json<MarkSoldRequest>,
) -> Result<Response, Error> {
    let user = context
        .authorize(user::Role::is_admin)
        .await?;

    let land = context
        .service()
        .execute(command::MarkLandSold {
            id,
            purchased_by: req.purchased_by,
        })
        .await
        .map_err(AsError::into_error)?;

    let dto = Land::from(land);
    context
        .audit(
            &user,
            activity::Action::Update,
            activity::Entity::Land,
            Some(dto.business_id.to_string()),
            format!("Marked `Land` {} as sold", dto.business_id),
            None,
            serde_json::to_value(&dto).ok(),
        )
        .await;

    Ok(api::ok(dto))
}

/// Body of the [`assign_agent`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct AssignAgentRequest {
    /// ID of the agent to assign.
    pub agent_id: agent::Id,

    /// Indicator whether the agent becomes the primary one.
    #[serde(default)]
    pub is_primary: bool,

    /// Free-form notes about the assignment.
    pub notes: Option<String>,
}

/// Assigns an agent to a [`Land`].
///
/// # Errors
///
/// Errors if the request is not authorized, or the [`Land`] or agent does
/// not exist.
pub async fn assign_agent(
    context: Context,
    Path(id): Path<land::Id>,
    Json(req): Json<AssignAgentRequest>,
) -> Result<Response, Error> {
    let user = context
        .authorize(user::Role::may_delete_records)
        .await?;

    let assignment = context
        .service()
        .execute(command::AssignAgent {
            land_id: id,
            agent_id: req.agent_id,
            is_primary: req.is_primary,
            notes: req.notes,
        })
        .await
        .map_err(AsError::into_error)?;

    let dto = Assignment::from(assignment);
    context
        .audit(
            &user,
            activity::Action::Assign,
            activity::Entity::Land,
            Some(dto.land_id.to_string()),
            format!(
                "Assigned `Agent({})` to `Land({})`",
                dto.agent_id, dto.land_id,
            ),
            None,
            serde_json::to_value(&dto).ok(),
        )
        .await;

    Ok(api::ok(dto))
}

impl AsError for command::create_land::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_land::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::InvalidAreaSize => Some(Error::validation(vec![Violation {
                field: "area_size",
                message: self.to_string(),
            }])),
        }
    }
}

impl AsError for command::update_land::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_land::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::InvalidAreaSize => Some(Error::validation(vec![Violation {
                field: "area_size",
                message: self.to_string(),
            }])),
            E::LandNotExists(_) => Some(LandError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_land::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::delete_land::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::LandHasTransactions(_) => {
                Some(LandError::HasTransactions.into())
            }
            E::LandNotExists(_) => Some(LandError::NotFound.into()),
        }
    }
}

impl AsError for command::mark_land_sold::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::mark_land_sold::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::CustomerNotExists(_) => {
                Some(api::customers::CustomerError::NotFound.into())
            }
            E::LandNotExists(_) => Some(LandError::NotFound.into()),
        }
    }
}

impl AsError for command::assign_agent::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::assign_agent::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::AgentNotExists(_) => {
                Some(api::agents::AgentError::NotFound.into())
            }
            E::LandNotExists(_) => Some(LandError::NotFound.into()),
        }
    }
}

define_error! {
    enum LandError {
        #[code = "LAND_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Land` not found"]
        NotFound,

        #[code = "LAND_HAS_TRANSACTIONS"]
        #[status = CONFLICT]
        #[message = "`Land` is referenced by transactions"]
        HasTransactions,
    }
}
