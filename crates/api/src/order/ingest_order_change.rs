use crate::{error::ApiError, shared::auth::protect_feed_route};
use actix_web::{web, HttpRequest, HttpResponse};
use order_reminders_api_structs::ingest_order_change::*;
use order_reminders_domain::OrderChange;
use order_reminders_infra::ReminderContext;

/// Puts the order change on the order feed. Reconciliation happens in the
/// background, so the change is only accepted here.
pub async fn ingest_order_change_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ApiError> {
    protect_feed_route(&http_req, &ctx)?;

    let body = body.0;
    if body.order_id.trim().is_empty() {
        return Err(ApiError::BadClientData(
            "The order id must not be empty".into(),
        ));
    }

    let order_id = body.order_id.clone();
    ctx.feeds.publish_order_change(OrderChange {
        order_id: body.order_id,
        before: body.before,
        after: body.after,
    });

    Ok(HttpResponse::Accepted().json(APIResponse { order_id }))
}
