//! REST API definitions.

pub mod activities;
pub mod agents;
pub mod auth;
pub mod customers;
pub mod export;
pub mod lands;
pub mod reports;
pub mod search;
pub mod transactions;
pub mod users;

use std::fmt;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::pagination;
use serde::{Deserialize, Serialize};

use crate::{Error, Violation};

/// Assembles the [`Router`] serving the whole API.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/lands", get(lands::list).post(lands::create))
        .route("/api/lands/stats", get(lands::stats))
        .route(
            "/api/lands/:id",
            get(lands::single).put(lands::update).delete(lands::delete),
        )
        .route("/api/lands/:id/mark-sold", post(lands::mark_sold))
        .route("/api/lands/:id/assign-agent", post(lands::assign_agent))
        .route("/api/customers", get(customers::list).post(customers::create))
        .route(
            "/api/customers/:id",
            get(customers::single)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/api/customers/:id/purchases", get(customers::purchases))
        .route("/api/agents", get(agents::list).post(agents::create))
        .route(
            "/api/agents/:id",
            get(agents::single)
                .put(agents::update)
                .delete(agents::delete),
        )
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/api/transactions/stats", get(transactions::stats))
        .route(
            "/api/transactions/:id",
            get(transactions::single)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/api/transactions/:id/pay-commission",
            post(transactions::pay_commission),
        )
        .route(
            "/api/transactions/land/:id/payments",
            get(transactions::land_payments),
        )
        .route("/api/users", get(users::list))
        .route("/api/users/:id", get(users::single).put(users::update))
        .route("/api/search", get(search::search))
        .route("/api/reports/dashboard", get(reports::dashboard))
        .route("/api/activities", get(activities::list))
        .route("/api/export/:entity", get(export::export))
}

/// Renders a successful response envelope with the provided `data`.
fn ok<T: Serialize>(data: T) -> Response {
    Json(serde_json::json!({ "success": true, "data": data }))
        .into_response()
}

/// Renders a successful creation envelope with the provided `data`.
fn created<T: Serialize>(data: T) -> Response {
    (
        http::StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": data })),
    )
        .into_response()
}

/// Renders a successful page envelope, converting every item into its
/// serialized representation.
fn paginated<I, T>(page: pagination::Page<I>) -> Response
where
    T: From<I> + Serialize,
{
    let pages = page.pages();
    let items = page.items.into_iter().map(T::from).collect::<Vec<_>>();
    Json(serde_json::json!({
        "success": true,
        "data": items,
        "pagination": {
            "total": page.total,
            "page": page.page,
            "limit": page.limit,
            "pages": pages,
        },
    }))
    .into_response()
}

/// Maps a parsing error of the named field into a validation [`Error`].
fn invalid<E: fmt::Display>(field: &'static str) -> impl FnOnce(E) -> Error {
    move |e| {
        Error::validation(vec![Violation {
            field,
            message: e.to_string(),
        }])
    }
}

/// Order of items in list responses.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Oldest first.
    Asc,

    /// Newest first.
    #[default]
    Desc,
}

impl From<Order> for pagination::Order {
    fn from(value: Order) -> Self {
        match value {
            Order::Asc => Self::Ascending,
            Order::Desc => Self::Descending,
        }
    }
}

/// Builds pagination [`pagination::Arguments`] out of the raw query
/// parameters.
fn arguments(
    page: Option<u32>,
    limit: Option<u32>,
    order: Option<Order>,
) -> pagination::Arguments {
    pagination::Arguments::new(page, limit, order.unwrap_or_default().into())
}
