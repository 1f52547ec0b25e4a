//! Reporting API definitions.

use axum::response::Response;
use service::{query, Query as _};

use crate::{api, AsError, Context, Error};

/// Returns the dashboard summary.
///
/// # Errors
///
/// Errors if the request is not authenticated.
pub async fn dashboard(context: Context) -> Result<Response, Error> {
    _ = context.current_user().await?;

    let summary = context
        .service()
        .execute(query::report::Summary)
        .await
        .map_err(AsError::into_error)?;

    Ok(api::ok(serde_json::json!({
        "lands": {
            "available": summary.lands.available,
            "reserved": summary.lands.reserved,
            "sold": summary.lands.sold,
            "total": summary.lands.total(),
            "total_value": summary.lands.total_value,
            "sold_value": summary.lands.sold_value,
        },
        "transactions": {
            "count": summary.transactions.count,
            "completed_amount": summary.transactions.completed_amount,
            "pending_amount": summary.transactions.pending_amount,
            "total_commission": summary.transactions.total_commission,
            "unpaid_commission": summary.transactions.unpaid_commission,
        },
    })))
}
