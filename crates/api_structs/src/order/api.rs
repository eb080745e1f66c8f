use crate::dtos::NotificationDTO;
use order_reminders_domain::{Notification, OrderSnapshot};
use serde::{Deserialize, Serialize};

pub mod ingest_order_change {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub order_id: String,
        #[serde(default)]
        pub before: Option<OrderSnapshot>,
        #[serde(default)]
        pub after: Option<OrderSnapshot>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub order_id: String,
    }
}

pub mod get_order_notifications {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct PathParams {
        pub order_id: String,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notifications: Vec<NotificationDTO>,
    }

    impl APIResponse {
        pub fn new(notifications: Vec<Notification>) -> Self {
            Self {
                notifications: notifications
                    .into_iter()
                    .map(NotificationDTO::new)
                    .collect(),
            }
        }
    }
}
