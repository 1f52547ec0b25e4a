//! Activity log API definitions.

use axum::{extract::Query, response::Response};
use common::DateTime;
use serde::{Deserialize, Serialize};
use service::{
    domain::{activity, user},
    query, read, Query as _,
};

use crate::{api, AsError, Context, Error};

/// Serialized representation of an [`activity::Entry`].
#[derive(Clone, Debug, Serialize)]
pub struct Entry {
    /// ID of this [`Entry`].
    pub id: activity::Id,

    /// ID of the user who performed the action.
    pub user_id: user::Id,

    /// Performed action.
    pub action: activity::Action,

    /// Entity the action was performed upon.
    pub entity: activity::Entity,

    /// Identifier of the affected entity, if any.
    pub entity_id: Option<String>,

    /// Human-readable description of the action.
    pub description: String,

    /// JSON snapshot of the entity before the action.
    pub old_values: Option<serde_json::Value>,

    /// JSON snapshot of the entity after the action.
    pub new_values: Option<serde_json::Value>,

    /// IP address the request came from.
    pub ip_address: Option<String>,

    /// User agent of the client.
    pub user_agent: Option<String>,

    /// When this [`Entry`] was recorded.
    pub created_at: DateTime,
}

impl From<activity::Entry> for Entry {
    fn from(e: activity::Entry) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            action: e.action,
            entity: e.entity,
            entity_id: e.entity_id,
            description: e.description,
            old_values: e.old_values,
            new_values: e.new_values,
            ip_address: e.ip_address,
            user_agent: e.user_agent,
            created_at: e.created_at,
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

    /// User to filter by.
    pub user_id: Option<user::Id>,

    /// Entity kind to filter by.
    pub entity: Option<activity::Entity>,

    /// Action to filter by.
    pub action: Option<activity::Action>,
}

/// Lists activity log [`Entry`]s matching the provided filters.
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
        user_id,
        entity,
        action,
    } = params;

    let selector = read::activity::list::Selector {
        arguments: api::arguments(page, limit, order),
        filter: read::activity::list::Filter {
            user_id,
            entity,
            action,
        },
    };
    let page = context
        .service()
        .execute(query::activities::List::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::paginated::<_, Entry>(page))
}
