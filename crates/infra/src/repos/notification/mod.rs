mod inmemory;
mod postgres;

use super::shared::repo::DeleteResult;
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryNotificationRepo;
use order_reminders_domain::{Notification, ID};
pub use postgres::PostgresNotificationRepo;

#[async_trait::async_trait]
pub trait INotificationRepo: Send + Sync {
    async fn insert(&self, notification: &Notification) -> anyhow::Result<()>;
    /// Cancels every active `Notification` of the order and inserts
    /// `notifications` as one atomic batch. Returns the canceled
    /// `Notification`s as they were before they got canceled.
    async fn replace_for_order(
        &self,
        order_id: &str,
        canceled_at: DateTime<Utc>,
        notifications: &[Notification],
    ) -> anyhow::Result<Vec<Notification>>;
    async fn cancel_by_order(
        &self,
        order_id: &str,
        canceled_at: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Notification>> {
        self.replace_for_order(order_id, canceled_at, &[]).await
    }
    async fn find(&self, notification_id: &ID) -> Option<Notification>;
    /// Every stored `Notification` of the order ordered by `scheduled_time`
    async fn find_by_order(&self, order_id: &str) -> Vec<Notification>;
    /// `Queued` notifications with `scheduled_time <= before`
    async fn find_due(&self, before: DateTime<Utc>) -> anyhow::Result<Vec<Notification>>;
    async fn save(&self, notification: &Notification) -> anyhow::Result<()>;
    /// Stores `notification` only if the stored version still equals
    /// `notification.version`. Returns the stored `Notification` with its new
    /// version, or `None` when it was changed or deleted in the meantime.
    /// Fails when it would become a second active `Notification` of the order
    /// at the same instant.
    async fn update_if_current(
        &self,
        notification: &Notification,
    ) -> anyhow::Result<Option<Notification>>;
    async fn delete(&self, notification_id: &ID) -> Option<Notification>;
    /// Purges `Sent` notifications that were sent before `before`
    async fn delete_sent_before(&self, before: DateTime<Utc>) -> anyhow::Result<DeleteResult>;
}
