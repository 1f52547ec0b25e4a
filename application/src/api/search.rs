//! Global search API definitions.

use axum::{extract::Query, response::Response};
use serde::Deserialize;
use service::{query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Minimum length of a [`search`] term producing any matches.
const MIN_TERM_LEN: usize = 2;

/// Query parameters of the [`search`] handler.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Term to search for.
    pub q: Option<String>,

    /// Maximum number of items per entity group.
    pub limit: Option<u32>,
}

/// Searches [`Land`]s, [`Customer`]s and [`Agent`]s by a single fuzzy term,
/// returning the matches grouped by entity.
///
/// Terms shorter than 2 characters yield empty groups.
///
/// [`Agent`]: service::domain::Agent
/// [`Customer`]: service::domain::Customer
/// [`Land`]: service::domain::Land
///
/// # Errors
///
/// Errors if the request is not authenticated.
pub async fn search(
    context: Context,
    Query(params): Query<SearchParams>,
) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let term = params
        .q
        .map(|q| q.trim().to_owned())
        .filter(|q| q.chars().count() >= MIN_TERM_LEN);
    let Some(term) = term else {
        return Ok(api::ok(serde_json::json!({
            "lands": [],
            "customers": [],
            "agents": [],
        })));
    };

    let arguments = api::arguments(None, params.limit, None);

    let lands = context
        .service()
        .execute(query::lands::List::by(read::land::list::Selector {
            arguments,
            filter: read::land::list::Filter {
                search: Some(term.clone()),
                ..read::land::list::Filter::default()
            },
        }))
        .await
        .map_err(AsError::into_error)?
        .items
        .into_iter()
        .map(api::lands::Land::from)
        .collect::<Vec<_>>();

    let customers = context
        .service()
        .execute(query::customers::List::by(read::customer::list::Selector {
            arguments,
            filter: read::customer::list::Filter {
                search: Some(term.clone()),
                is_active: None,
            },
        }))
        .await
        .map_err(AsError::into_error)?
        .items
        .into_iter()
        .map(api::customers::Customer::from)
        .collect::<Vec<_>>();

    let agents = context
        .service()
        .execute(query::agents::List::by(read::agent::list::Selector {
            arguments,
            filter: read::agent::list::Filter {
                search: Some(term),
                is_active: None,
            },
        }))
        .await
        .map_err(AsError::into_error)?
        .items
        .into_iter()
        .map(api::agents::Agent::from)
        .collect::<Vec<_>>();

    Ok(api::ok(serde_json::json!({
        "lands": lands,
        "customers": customers,
        "agents": agents,
    })))
}
