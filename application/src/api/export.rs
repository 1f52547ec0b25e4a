//! CSV export API definitions.

use std::fmt;

use axum::{
    extract::Path,
    response::{IntoResponse as _, Response},
};
use common::pagination;
use serde::Deserialize;
use service::{query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Entity kind available for export.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    /// Land parcels.
    Lands,

    /// Customers.
    Customers,

    /// Sales agents.
    Agents,

    /// Payment transactions.
    Transactions,
}

/// Exports all records of the requested [`Entity`] as a CSV file.
///
/// # Errors
///
/// Errors if the request is not authenticated, or the export fails.
pub async fn export(
    context: Context,
    Path(entity): Path<Entity>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let csv = match entity {
        Entity::Lands => lands(&context).await?,
        Entity::Customers => customers(&context).await?,
        Entity::Agents => agents(&context).await?,
        Entity::Transactions => transactions(&context).await?,
    };

    Ok((
        [
            (http::header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                http::header::CONTENT_DISPOSITION,
                match entity {
                    Entity::Lands => "attachment; filename=\"lands.csv\"",
                    Entity::Customers => {
                        "attachment; filename=\"customers.csv\""
                    }
                    Entity::Agents => "attachment; filename=\"agents.csv\"",
                    Entity::Transactions => {
                        "attachment; filename=\"transactions.csv\""
                    }
                },
            ),
        ],
        csv,
    )
        .into_response())
}

/// Renders all [`Land`]s as CSV.
///
/// [`Land`]: service::domain::Land
async fn lands(context: &Context) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record([
            "business_id",
            "location",
            "area_size",
            "area_unit",
            "price",
            "survey_number",
            "kind",
            "status",
            "purchased_by",
            "created_at",
        ])
        .map_err(|e| Error::internal(&e))?;

    let mut arguments = first_page();
    loop {
        let page = context
            .service()
            .execute(query::lands::List::by(read::land::list::Selector {
                arguments,
                filter: read::land::list::Filter::default(),
            }))
            .await
            .map_err(AsError::into_error)?;
        for land in &page.items {
            writer
                .write_record([
                    land.business_id.to_string(),
                    land.location.to_string(),
                    land.area_size.to_string(),
                    land.area_unit.to_string(),
                    land.price.to_string(),
                    opt(land.survey_number.as_ref()),
                    land.kind.to_string(),
                    land.status.to_string(),
                    opt(land.purchased_by.as_ref()),
                    land.created_at.to_string(),
                ])
                .map_err(|e| Error::internal(&e))?;
        }
        if !next_page(&mut arguments, page.items.len(), page.total) {
            break;
        }
    }

    writer
        .into_inner()
        .map_err(|e| Error::internal(&e.to_string()))
}

/// Renders all [`Customer`]s as CSV.
///
/// [`Customer`]: service::domain::Customer
async fn customers(context: &Context) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record([
            "business_id",
            "name",
            "phone",
            "email",
            "city",
            "state",
            "is_active",
            "created_at",
        ])
        .map_err(|e| Error::internal(&e))?;

    let mut arguments = first_page();
    loop {
        let page = context
            .service()
            .execute(query::customers::List::by(
                read::customer::list::Selector {
                    arguments,
                    filter: read::customer::list::Filter::default(),
                },
            ))
            .await
            .map_err(AsError::into_error)?;
        for customer in &page.items {
            writer
                .write_record([
                    customer.business_id.to_string(),
                    customer.name.to_string(),
                    customer.phone.to_string(),
                    opt(customer.email.as_ref()),
                    opt(customer.city.as_ref()),
                    opt(customer.state.as_ref()),
                    customer.is_active.to_string(),
                    customer.created_at.to_string(),
                ])
                .map_err(|e| Error::internal(&e))?;
        }
        if !next_page(&mut arguments, page.items.len(), page.total) {
            break;
        }
    }

    writer
        .into_inner()
        .map_err(|e| Error::internal(&e.to_string()))
}

/// Renders all [`Agent`]s as CSV.
///
/// [`Agent`]: service::domain::Agent
async fn agents(context: &Context) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record([
            "business_id",
            "name",
            "phone",
            "email",
            "commission_percent",
            "joining_date",
            "is_active",
            "total_sales",
            "total_commission_earned",
            "created_at",
        ])
        .map_err(|e| Error::internal(&e))?;

    let mut arguments = first_page();
    loop {
        let page = context
            .service()
            .execute(query::agents::List::by(read::agent::list::Selector {
                arguments,
                filter: read::agent::list::Filter::default(),
            }))
            .await
            .map_err(AsError::into_error)?;
        for agent in &page.items {
            writer
                .write_record([
                    agent.business_id.to_string(),
                    agent.name.to_string(),
                    agent.phone.to_string(),
                    opt(agent.email.as_ref()),
                    agent.commission_percent.to_string(),
                    agent.joining_date.to_string(),
                    agent.is_active.to_string(),
                    agent.total_sales.to_string(),
                    agent.total_commission_earned.to_string(),
                    agent.created_at.to_string(),
                ])
                .map_err(|e| Error::internal(&e))?;
        }
        if !next_page(&mut arguments, page.items.len(), page.total) {
            break;
        }
    }

    writer
        .into_inner()
        .map_err(|e| Error::internal(&e.to_string()))
}

/// Renders all [`Transaction`]s as CSV.
///
/// [`Transaction`]: service::domain::Transaction
async fn transactions(context: &Context) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record([
            "business_id",
            "receipt_number",
            "land_id",
            "customer_id",
            "agent_id",
            "amount",
            "payment_method",
            "payment_kind",
            "transaction_date",
            "status",
            "commission",
            "commission_paid",
            "created_at",
        ])
        .map_err(|e| Error::internal(&e))?;

    let mut arguments = first_page();
    loop {
        let page = context
            .service()
            .execute(query::transactions::List::by(
                read::transaction::list::Selector {
                    arguments,
                    filter: read::transaction::list::Filter::default(),
                },
            ))
            .await
            .map_err(AsError::into_error)?;
        for t in &page.items {
            writer
                .write_record([
                    t.business_id.to_string(),
                    t.receipt_number.to_string(),
                    t.land_id.to_string(),
                    t.customer_id.to_string(),
                    opt(t.agent_id.as_ref()),
                    t.amount.to_string(),
                    t.payment_method.to_string(),
                    t.payment_kind.to_string(),
                    t.transaction_date.to_string(),
                    t.status.to_string(),
                    t.commission.to_string(),
                    t.commission_paid.to_string(),
                    t.created_at.to_string(),
                ])
                .map_err(|e| Error::internal(&e))?;
        }
        if !next_page(&mut arguments, page.items.len(), page.total) {
            break;
        }
    }

    writer
        .into_inner()
        .map_err(|e| Error::internal(&e.to_string()))
}

/// Returns [`pagination::Arguments`] of the first export page.
fn first_page() -> pagination::Arguments {
    pagination::Arguments::new(
        Some(1),
        Some(pagination::Arguments::MAX_LIMIT),
        pagination::Order::Ascending,
    )
}

/// Advances to the next page, returning whether more items remain.
fn next_page(
    arguments: &mut pagination::Arguments,
    fetched: usize,
    total: u64,
) -> bool {
    if fetched == 0 {
        return false;
    }
    let seen = arguments.offset() + fetched as u64;
    if seen >= total {
        return false;
    }
    arguments.page += 1;
    true
}

/// Renders an optional value as a CSV cell.
fn opt<T: fmt::Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}
