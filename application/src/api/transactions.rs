//! [`Transaction`]-related API definitions.
//!
//! [`Transaction`]: domain::Transaction

use axum::{
    extract::{Path, Query},
    response::Response,
    Json,
};
use common::{Date, DateTime, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, activity, agent, customer, land, transaction, user, FileRef},
    query, read, Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Serialized representation of a [`domain::Transaction`].
#[derive(Clone, Debug, Serialize)]
pub struct Transaction {
    /// ID of this [`Transaction`].
    pub id: transaction::Id,

    /// Human-facing identifier of this [`Transaction`].
    pub business_id: transaction::BusinessId,

    /// Receipt number issued for this [`Transaction`].
    pub receipt_number: transaction::ReceiptNumber,

    /// ID of the land this [`Transaction`] pays for.
    pub land_id: land::Id,

    /// ID of the paying customer.
    pub customer_id: customer::Id,

    /// ID of the agent who brokered this [`Transaction`].
    pub agent_id: Option<agent::Id>,

    /// Paid amount.
    pub amount: Money,

    /// Method the payment was made with.
    pub payment_method: transaction::Method,

    /// Kind of the payment.
    pub payment_kind: transaction::PaymentKind,

    /// 1-based number of the installment, for installment payments.
    pub installment_number: Option<i32>,

    /// Total number of planned installments.
    pub total_installments: Option<i32>,

    /// Date the payment was made on.
    pub transaction_date: Date,

    /// Reference to the uploaded receipt file.
    pub receipt_file: Option<FileRef>,

    /// Cheque number, for cheque payments.
    pub cheque_number: Option<String>,

    /// Date on the cheque, for cheque payments.
    pub cheque_date: Option<Date>,

    /// Bank reference of the payment, if any.
    pub bank_reference: Option<String>,

    /// Status of this [`Transaction`].
    pub status: transaction::Status,

    /// Free-form notes about this [`Transaction`].
    pub notes: Option<String>,

    /// Commission earned by the agent on this [`Transaction`].
    pub commission: Money,

    /// Indicator whether the commission has been paid out.
    pub commission_paid: bool,

    /// When this [`Transaction`] was created.
    pub created_at: DateTime,
}

impl From<domain::Transaction> for Transaction {
    fn from(t: domain::Transaction) -> Self {
        Self {
            id: t.id,
            business_id: t.business_id,
            receipt_number: t.receipt_number,
            land_id: t.land_id,
            customer_id: t.customer_id,
            agent_id: t.agent_id,
            amount: t.amount,
            payment_method: t.payment_method,
            payment_kind: t.payment_kind,
            installment_number: t.installment_number,
            total_installments: t.total_installments,
            transaction_date: t.transaction_date,
            receipt_file: t.receipt_file,
            cheque_number: t.cheque_number,
            cheque_date: t.cheque_date,
            bank_reference: t.bank_reference,
            status: t.status,
            notes: t.notes,
            commission: t.commission,
            commission_paid: t.commission_paid,
            created_at: t.created_at,
        }
    }
}

/// [`Transaction`] hydrated with the entities it references.
#[derive(Clone, Debug, Serialize)]
pub struct Details {
    /// The [`Transaction`] itself.
    #[serde(flatten)]
    pub transaction: Transaction,

    /// Land the [`Transaction`] pays for.
    pub land: api::lands::Land,

    /// Paying customer.
    pub customer: api::customers::Customer,

    /// Agent who brokered the [`Transaction`], if any.
    pub agent: Option<api::agents::Agent>,
}

impl From<read::transaction::Details> for Details {
    fn from(d: read::transaction::Details) -> Self {
        Self {
            transaction: d.transaction.into(),
            land: d.land.into(),
            customer: d.customer.into(),
            agent: d.agent.map(Into::into),
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

    /// Status to filter by.
    pub status: Option<transaction::Status>,

    /// Payment method to filter by.
    pub method: Option<transaction::Method>,

    /// Land to filter by.
    pub land_id: Option<land::Id>,

    /// Customer to filter by.
    pub customer_id: Option<customer::Id>,

    /// Agent to filter by.
    pub agent_id: Option<agent::Id>,

    /// Earliest transaction date (inclusive).
    pub from: Option<Date>,

    /// Latest transaction date (inclusive).
    pub to: Option<Date>,
}

/// Lists [`Transaction`]s matching the provided filters.
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
        status,
        method,
        land_id,
        customer_id,
        agent_id,
        from,
        to,
    } = params;

    let selector = read::transaction::list::Selector {
        arguments: api::arguments(page, limit, order),
        filter: read::transaction::list::Filter {
            search,
            status,
            method,
            land_id,
            customer_id,
            agent_id,
            from,
            to,
        },
    };
    let page = context
        .service()
        .execute(query::transactions::List::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::paginated::<_, Transaction>(page))
}

/// Returns a single hydrated [`Transaction`] by its ID.
///
/// # Errors
///
/// Errors if the request is not authenticated, or no such [`Transaction`]
/// exists.
pub async fn single(
    context: Context,
    Path(id): Path<transaction::Id>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let details = context
        .service()
        .execute(query::transactions::Single::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(TransactionError::NotFound)?;

    Ok(api::ok(Details::from(details)))
}

/// Returns aggregated [`Transaction`] counters.
///
/// # Errors
///
/// Errors if the request is not authenticated.
pub async fn stats(context: Context) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let stats = context
        .service()
        .execute(query::transactions::Stats::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::ok(serde_json::json!({
        "count": stats.count,
        "completed_amount": stats.completed_amount,
        "pending_amount": stats.pending_amount,
        "total_commission": stats.total_commission,
        "unpaid_commission": stats.unpaid_commission,
    })))
}

/// Returns the payment progress of a single land.
///
/// # Errors
///
/// Errors if the request is not authenticated, or no such land exists.
pub async fn land_payments(
    context: Context,
    Path(id): Path<land::Id>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let payments = context
        .service()
        .execute(query::transactions::LandPayments::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(api::lands::LandError::NotFound)?;

    let balance = payments.balance();
    let transactions = payments
        .transactions
        .into_iter()
        .map(Transaction::from)
        .collect::<Vec<_>>();

    Ok(api::ok(serde_json::json!({
        "land_price": payments.land_price,
        "total_paid": payments.total_paid,
        "balance": balance,
        "transactions": transactions,
    })))
}

/// Body of the [`create`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRequest {
    /// ID of the land being paid for.
    pub land_id: land::Id,

    /// ID of the paying customer.
    pub customer_id: customer::Id,

    /// ID of the agent facilitating the payment, if any.
    pub agent_id: Option<agent::Id>,

    /// Paid amount.
    pub amount: Decimal,

    /// Method the payment is made with.
    pub payment_method: transaction::Method,

    /// Kind of the payment.
    pub payment_kind: transaction::PaymentKind,

    /// Ordinal number of the installment, for installment payments.
    pub installment_number: Option<i32>,

    /// Total number of planned installments.
    pub total_installments: Option<i32>,

    /// Date the payment was made on.
    ///
    /// Defaults to today if omitted.
    pub transaction_date: Option<Date>,

    /// Reference to the uploaded receipt document.
    pub receipt_file: Option<String>,

    /// Cheque number, for cheque payments.
    pub cheque_number: Option<String>,

    /// Cheque date, for cheque payments.
    pub cheque_date: Option<Date>,

    /// Bank reference number, for bank transfers.
    pub bank_reference: Option<String>,

    /// Free-form notes about the payment.
    pub notes: Option<String>,
}

/// Records a new [`Transaction`].
///
/// # Errors
///
/// Errors if the request is not authorized, the body is invalid, or a
/// referenced entity does not exist.
pub async fn create(
    context: Context,
    Json(req): Json<CreateRequest>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::may_edit_records).await?;

    let amount = Money::new(req.amount)
        .ok_or("cannot be negative")
        .map_err(api::invalid("amount"))?;
    let receipt_file = req
        .receipt_file
        .map(|f| f.parse::<FileRef>())
        .transpose()
        .map_err(api::invalid("receipt_file"))?;

    let details = context
        .service()
        .execute(command::RecordTransaction {
            land_id: req.land_id,
            customer_id: req.customer_id,
            agent_id: req.agent_id,
            amount,
            payment_method: req.payment_method,
            payment_kind: req.payment_kind,
            installment_number: req.installment_number,
            total_installments: req.total_installments,
            transaction_date: req.transaction_date,
            receipt_file,
            cheque_number: req.cheque_number,
            cheque_date: req.cheque_date,
            bank_reference: req.bank_reference,
            notes: req.notes,
        })
        .await
        .map_err(AsError::into_error)?;

    let dto = Details::from(details);
    context
        .audit(
            &user,
            activity::Action::Create,
            activity::Entity::Transaction,
            Some(dto.transaction.business_id.to_string()),
            format!(
                "Recorded `Transaction` {} against `Land` {}",
                dto.transaction.business_id, dto.land.business_id,
            ),
            None,
            serde_json::to_value(&dto.transaction).ok(),
        )
        .await;

    Ok(api::created(dto))
}

/// Body of the [`update`] handler.
///
/// Absent fields keep their current values.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateRequest {
    /// New involved agent.
    pub agent_id: Option<agent::Id>,

    /// New paid amount.
    pub amount: Option<Decimal>,

    /// New payment method.
    pub payment_method: Option<transaction::Method>,

    /// New payment kind.
    pub payment_kind: Option<transaction::PaymentKind>,

    /// New installment ordinal number.
    pub installment_number: Option<i32>,

    /// New total number of planned installments.
    pub total_installments: Option<i32>,

    /// New payment date.
    pub transaction_date: Option<Date>,

    /// New reference to the uploaded receipt document.
    pub receipt_file: Option<String>,

    /// New cheque number.
    pub cheque_number: Option<String>,

    /// New cheque date.
    pub cheque_date: Option<Date>,

    /// New bank reference number.
    pub bank_reference: Option<String>,

    /// New status.
    pub status: Option<transaction::Status>,

    /// New free-form notes.
    pub notes: Option<String>,
}

/// Updates an existing [`Transaction`].
///
/// # Errors
///
/// Errors if the request is not authorized, the body is invalid, or no such
/// [`Transaction`] exists.
pub async fn update(
    context: Context,
    Path(id): Path<transaction::Id>,
    Json(req): Json<UpdateRequest>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::may_edit_records).await?;

    let amount = req
        .amount
        .map(|a| Money::new(a).ok_or("cannot be negative"))
        .transpose()
        .map_err(api::invalid("amount"))?;
    let receipt_file = req
        .receipt_file
        .map(|f| f.parse::<FileRef>())
        .transpose()
        .map_err(api::invalid("receipt_file"))?;

    let output = context
        .service()
        .execute(command::UpdateTransaction {
            id,
            agent_id: req.agent_id,
            amount,
            payment_method: req.payment_method,
            payment_kind: req.payment_kind,
            installment_number: req.installment_number,
            total_installments: req.total_installments,
            transaction_date: req.transaction_date,
            receipt_file,
            cheque_number: req.cheque_number,
            cheque_date: req.cheque_date,
            bank_reference: req.bank_reference,
            status: req.status,
            notes: req.notes,
        })
        .await
        .map_err(AsError::into_error)?;

    let before = Transaction::from(output.before);
    let after = Transaction::from(output.after);
    context
        .audit(
            &user,
            activity::Action::Update,
            activity::Entity::Transaction,
            Some(after.business_id.to_string()),
            format!("Updated `Transaction` {}", after.business_id),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&after).ok(),
        )
        .await;

    Ok(api::ok(after))
}

/// Deletes an existing [`Transaction`].
///
/// # Errors
///
/// Errors if the request is not authorized, or no such [`Transaction`]
/// exists.
pub async fn delete(
    context: Context,
    Path(id): Path<transaction::Id>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::may_delete_records).await?;

    let transaction = context
        .service()
        .execute(command::DeleteTransaction { id })
        .await
        .map_err(AsError::into_error)?;

    let dto = Transaction::from(transaction);
    context
        .audit(
            &user,
            activity::Action::Delete,
            activity::Entity::Transaction,
            Some(dto.business_id.to_string()),
            format!("Deleted `Transaction` {}", dto.business_id),
            serde_json::to_value(&dto).ok(),
            None,
        )
        .await;

    Ok(api::ok(dto))
}

/// Marks the commission of a [`Transaction`] as paid out.
///
/// # Errors
///
/// Errors if the request is not authorized, or no such [`Transaction`]
/// exists.
pub async fn pay_commission(
    context: Context,
    Path(id): Path<transaction::Id>,
) -> Result<Response, Error> {
    let user = context.authorize(user::Role::may_delete_records).await?;

    let output = context
        .service()
        .execute(command::PayCommission { id })
        .await
        .map_err(AsError::into_error)?;

    let before = Transaction::from(output.before);
    let after = Transaction::from(output.after);
    context
        .audit(
            &user,
            activity::Action::Update,
            activity::Entity::Transaction,
            Some(after.business_id.to_string()),
            format!(
                "Marked commission of `Transaction` {} as paid",
                after.business_id,
            ),
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&after).ok(),
        )
        .await;

    Ok(api::ok(after))
}

impl AsError for command::record_transaction::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::record_transaction::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::CustomerNotExists(_) => {
                Some(api::customers::CustomerError::NotFound.into())
            }
            E::LandNotExists(_) => Some(api::lands::LandError::NotFound.into()),
        }
    }
}

impl AsError for command::update_transaction::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_transaction::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::TransactionNotExists(_) => {
                Some(TransactionError::NotFound.into())
            }
        }
    }
}

impl AsError for command::delete_transaction::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::delete_transaction::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::TransactionNotExists(_) => {
                Some(TransactionError::NotFound.into())
            }
        }
    }
}

impl AsError for command::pay_commission::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::pay_commission::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::TransactionNotExists(_) => {
                Some(TransactionError::NotFound.into())
            }
        }
    }
}

define_error! {
    enum TransactionError {
        #[code = "TRANSACTION_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Transaction` not found"]
        NotFound,
    }
}
