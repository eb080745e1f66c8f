use crate::{APIResponse, BaseClient};
use order_reminders_api_structs::*;
use order_reminders_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationClient {
    base: Arc<BaseClient>,
}

pub struct RescheduleNotificationInput {
    pub notification_id: ID,
    pub scheduled_time: String,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl NotificationClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn reschedule(
        &self,
        input: RescheduleNotificationInput,
    ) -> APIResponse<reschedule_notification::APIResponse> {
        let body = reschedule_notification::RequestBody {
            scheduled_time: input.scheduled_time,
            title: input.title,
            body: input.body,
        };
        self.base
            .put(
                body,
                format!("notifications/{}", input.notification_id),
                StatusCode::OK,
            )
            .await
    }
}
