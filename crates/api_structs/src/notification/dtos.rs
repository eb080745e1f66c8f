use chrono::{DateTime, Utc};
use order_reminders_domain::{instant_format, Notification, NotificationState, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDTO {
    pub id: ID,
    pub order_id: String,
    pub title: String,
    pub body: String,
    #[serde(with = "instant_format")]
    pub scheduled_time: DateTime<Utc>,
    pub state: NotificationState,
    #[serde(with = "instant_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "instant_format::option")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, with = "instant_format::option")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl NotificationDTO {
    pub fn new(notification: Notification) -> Self {
        Self {
            id: notification.id,
            order_id: notification.order_id,
            title: notification.title,
            body: notification.body,
            scheduled_time: notification.scheduled_time,
            state: notification.state,
            created_at: notification.created_at,
            canceled_at: notification.canceled_at,
            sent_at: notification.sent_at,
        }
    }
}
