use crate::{APIResponse, BaseClient};
use order_reminders_api_structs::*;
use order_reminders_domain::OrderSnapshot;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderClient {
    base: Arc<BaseClient>,
}

pub struct OrderChangeInput {
    pub order_id: String,
    pub before: Option<OrderSnapshot>,
    pub after: Option<OrderSnapshot>,
}

impl OrderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Publishes a change to an order. The reminders are reconciled in the
    /// background after the change has been accepted.
    pub async fn publish_change(
        &self,
        input: OrderChangeInput,
    ) -> APIResponse<ingest_order_change::APIResponse> {
        let body = ingest_order_change::RequestBody {
            order_id: input.order_id,
            before: input.before,
            after: input.after,
        };
        self.base
            .post(body, "orders/changes".into(), StatusCode::ACCEPTED)
            .await
    }

    pub async fn notifications(
        &self,
        order_id: String,
    ) -> APIResponse<get_order_notifications::APIResponse> {
        self.base
            .get(format!("orders/{}/notifications", order_id), StatusCode::OK)
            .await
    }
}
