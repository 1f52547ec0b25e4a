//! [`Customer`]-related API definitions.
//!
//! [`Customer`]: domain::Customer

use axum::{
    extract::{Path, Query},
    response::Response,
    Json,
};
use common::DateTime;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, activity, contact, customer, user, FileRef},
    query, read, Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Serialized representation of a [`domain::Customer`].
#[derive(Clone, Debug, Serialize)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: customer::Id,

    /// Human-facing identifier of this [`Customer`].
    pub business_id: customer::BusinessId,

    /// Name of this [`Customer`].
    pub name: contact::Name,

    /// Phone number of this [`Customer`].
    pub phone: contact::Phone,

    /// Email address of this [`Customer`].
    pub email: Option<contact::Email>,

    /// Postal address of this [`Customer`].
    pub address: Option<String>,

    /// City of this [`Customer`].
    pub city: Option<String>,

    /// State of this [`Customer`].
    pub state: Option<String>,

    /// Postal code of this [`Customer`].
    pub pincode: Option<String>,

    /// Kind of the provided identity proof.
    pub id_proof_kind: Option<customer::IdProofKind>,

    /// Number of the provided identity proof.
    pub id_proof_number: Option<String>,

    /// Reference to the uploaded identity proof document.
    pub id_proof_file: Option<FileRef>,

    /// Indicator whether this [`Customer`] is active.
    pub is_active: bool,

    /// Free-form notes about this [`Customer`].
    pub notes: Option<String>,

    /// When this [`Customer`] was created.
    pub created_at: DateTime,
}

impl From<domain::Customer> for Customer {
    fn from(c: domain::Customer) -> Self {
        Self {
            id: c.id,
            business_id: c.business_id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            address: c.address,
            city: c.city,
            state: c.state,
            pincode: c.pincode,
            id_proof_kind: c.id_proof_kind,
            id_proof_number: c.id_proof_number,
            id_proof_file: c.id_proof_file,
            is_active: c.is_active,
            notes: c.notes,
            created_at: c.created_at,
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

/// Lists [`Customer`]s matching the provided filters.
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

    let selector = read::customer::list::Selector {
        arguments: api::arguments(page, limit, order),
        filter: read::customer::list::Filter { search, is_active },
    };
    let page = context
        .service()
        .execute(query::customers::List::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::paginated::<_, Customer>(page))
}

/// Returns a single [`Customer`] by its ID.
///
/// # Errors
///
/// Errors if the request is not authenticated, or no such [`Customer`]
/// exists.
pub async fn single(
    context: Context,
    Path(id): Path<customer::Id>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let customer = context
        .service()
        .execute(query::customers::Single::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(CustomerError::NotFound)?;

    Ok(api::ok(Customer::from(customer)))
}

/// Returns the purchase history of a [`Customer`].
///
/// # Errors
///
/// Errors if the request is not authenticated.
pub async fn purchases(
    context: Context,
    Path(id): Path<customer::Id>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let purchases = context
        .service()
        .execute(query::customers::Purchases::by(id))
        .await
        .map_err(AsError::into_error)?;

    let lands = purchases
        .lands
        .into_iter()
        .map(api::lands::Land::from)
        .collect::<Vec<_>>();
    let transactions = purchases
        .transactions
        .into_iter()
        .map(api::transactions::Transaction::from)
        .collect::<Vec<_>>();

    Ok(api::ok(serde_json::json!({
        "lands": lands,
        "transactions": transactions,
    })))
}

/// Body of the [`create`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRequest {
    /// Name of the new customer.
    pub name: String,

    /// Phone number of the new customer.
    pub phone: String,

    /// Email address of the new customer.
    pub email: Option<String>,

    /// Postal address of the new customer.
    pub address: Option<String>,

    /// City of the new customer.
    pub city: Option<String>,

    /// State of the new customer.
    pub state: Option<String>,

    /// Postal code of the new customer.
    pub pincode: Option<String>,

    /// Kind of the provided identity proof.
    pub id_proof_kind: Option<customer::IdProofKind>,

    /// Number of the provided identity proof.
    pub id_proof_number: Option<String>,

    /// Reference to the uploaded identity proof document.
    pub id_proof_file: Option<String>,

    /// Free-form notes about the new customer.
    pub notes: Option<String>,
}

/// Creates a new [`Customer`].
///
/// # Errors
///
/// Errors if the request is not authorized, or the body is invalid.
pub async fn create(
    context: Context,
    Json(req): Json<CreateRequest>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::may_edit_records).await?;

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
    let id_proof_file = req
        .id_proof_file
        .map(|f| f.parse::<FileRef>())
        .transpose()
        .map_err(api::invalid("id_proof_file"))?;

    let customer = context
        .service()
        .execute(command::CreateCustomer {
            name,
            phone,
            email,
            address: req.address,
            city: req.city,
            state: req.state,
            pincode: req.pincode,
            id_proof_kind: req.id_proof_kind,
            id_proof_number: req.id_proof_number,
            id_proof_file,
            notes: req.notes,
        })
        .await
        .map_err(AsError::into_error)?;

    let dto = Customer::from(customer);
    context
        .audit(
            &user,
            activity::Action::Create,
            activity::Entity::Customer,
            Some(dto.business_id.to_string()),
            format!("Created `Customer` {}", dto.business_id),
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

    /// New city.
    pub city: Option<String>,

    /// New state.
    pub state: Option<String>,

    /// New postal code.
    pub pincode: Option<String>,

    /// New kind of the provided identity proof.
    pub id_proof_kind: Option<customer::IdProofKind>,

    /// New identity proof number.
    pub id_proof_number: Option<String>,

    /// New reference to the uploaded identity proof document.
    pub id_proof_file: Option<String>,

    /// New activity indicator.
    pub is_active: Option<bool>,

    /// New free-form notes.
    pub notes: Option<String>,
}

/// Updates an existing [`Customer`].
///
/// # Errors
///
/// Errors if the request is not authorized, the body is invalid, or no such
/// [`Customer`] exists.
pub async fn update(
    context: Context,
    Path(id): Path<customer::Id>,
    Json(req): Json<UpdateRequest>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::may_edit_records).await?;

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
    let id_proof_file = req
        .id_proof_file
        .map(|f| f.parse::<FileRef>())
        .transpose()
        .map_err(api::invalid("id_proof_file"))?;

    let output = context
        .service()
        .execute(command::UpdateCustomer {
            id,
            name,
            phone,
            email,
            address: req.address,
            city: req.city,
            state: req.state,
            pincode: req.pincode,
            id_proof_kind: req.id_proof_kind,
            id_proof_number: req.id_proof_number,
            id_proof_file,
            is_active: req.is_active,
            notes: req.notes,
        })
        .await
        .map_err(AsError::into_error)?;

    let before = Customer::from(output.before);
    let after = Customer::from(output.after);
    context
        .audit(
            &user,
            activity::Action::Update,
            activity::Entity::Customer,
            Some(after.business_id.to_string()),
            format!("Updated `Customer` {}", after.business_id),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&after).ok(),
        )
        .await;

    Ok(api::ok(after))
}

/// Deletes an existing [`Customer`].
///
/// # Errors
///
/// Errors if the request is not authorized, no such [`Customer`] exists, or
/// the [`Customer`] is referenced by transactions.
pub async fn delete(
    context: Context,
    Path(id): Path<customer::Id>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::may_delete_records).await?;

    let customer = context
        .service()
        .execute(command::DeleteCustomer { id })
        .await
        .map_err(AsError::into_error)?;

    let dto = Customer::from(customer);
    context
        .audit(
            &user,
            activity::Action::Delete,
            activity::Entity::Customer,
            Some(dto.business_id.to_string()),
            format!("Deleted `Customer` {}", dto.business_id),
            serde_json::to_value(&dto).ok(),
            None,
        )
        .await;

    Ok(api::ok(dto))
}

impl AsError for command::create_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_customer::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_customer::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::CustomerNotExists(_) => Some(CustomerError::NotFound.into()),
        }
    }
}

impl AsError for command::delete_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::delete_customer::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::CustomerHasTransactions(_) => {
                Some(CustomerError::HasTransactions.into())
            }
            E::CustomerNotExists(_) => Some(CustomerError::NotFound.into()),
        }
    }
}

define_error! {
    enum CustomerError {
        #[code = "CUSTOMER_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Customer` not found"]
        NotFound,

        #[code = "CUSTOMER_HAS_TRANSACTIONS"]
        #[status = CONFLICT]
        #[message = "`Customer` is referenced by transactions"]
        HasTransactions,
    }
}
