mod base;
mod notification;
mod order;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use notification::NotificationClient;
pub use notification::RescheduleNotificationInput;
use order::OrderClient;
pub use order::OrderChangeInput;
pub use order_reminders_api_structs::dtos::*;
pub use order_reminders_domain::{NotificationState, OrderSnapshot, OrderStatus, ID};
use status::StatusClient;
use std::sync::Arc;

/// Order Reminders SDK
///
/// The SDK contains methods for interacting with the order reminders server
/// API.
#[derive(Clone)]
pub struct OrderRemindersSDK {
    pub notification: NotificationClient,
    pub order: OrderClient,
    pub status: StatusClient,
}

impl OrderRemindersSDK {
    pub fn new<T: Into<String>>(address: String, feed_secret: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_feed_secret(feed_secret.into());
        let base = Arc::new(base);
        let notification = NotificationClient::new(base.clone());
        let order = OrderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            notification,
            order,
            status,
        }
    }
}
