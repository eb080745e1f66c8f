mod fcm;
mod inmemory;

pub use fcm::{FcmPushGateway, ServiceAccount};
pub use inmemory::{InMemoryPushGateway, SentPush};
use order_reminders_domain::Notification;

/// Content of a push notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub order_id: String,
}

impl From<&Notification> for PushMessage {
    fn from(notification: &Notification) -> Self {
        Self {
            title: notification.title.clone(),
            body: notification.body.clone(),
            order_id: notification.order_id.clone(),
        }
    }
}

/// Delivers push notifications to devices. A call either succeeds or fails
/// as a whole, delivery reports for individual tokens are not exposed.
#[async_trait::async_trait]
pub trait IPushGateway: Send + Sync {
    async fn send(&self, tokens: &[String], message: &PushMessage) -> anyhow::Result<()>;
}
