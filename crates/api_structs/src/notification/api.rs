use crate::dtos::NotificationDTO;
use order_reminders_domain::{Notification, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub notification: NotificationDTO,
}

impl NotificationResponse {
    pub fn new(notification: Notification) -> Self {
        Self {
            notification: NotificationDTO::new(notification),
        }
    }
}

pub mod reschedule_notification {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub notification_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// RFC 3339 timestamp with explicit offset
        pub scheduled_time: String,
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub body: Option<String>,
    }

    pub type APIResponse = NotificationResponse;
}
