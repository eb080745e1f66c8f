use super::INotificationRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use chrono::{DateTime, Utc};
use order_reminders_domain::{Notification, NotificationState, ID};
use std::collections::HashSet;

pub struct InMemoryNotificationRepo {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(vec![]),
        }
    }
}

impl Default for InMemoryNotificationRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationRepo for InMemoryNotificationRepo {
    async fn insert(&self, notification: &Notification) -> anyhow::Result<()> {
        insert(notification, &self.notifications);
        Ok(())
    }

    async fn replace_for_order(
        &self,
        order_id: &str,
        canceled_at: DateTime<Utc>,
        notifications: &[Notification],
    ) -> anyhow::Result<Vec<Notification>> {
        // Same constraint as the partial unique index in postgres
        let mut instants = HashSet::new();
        for n in notifications.iter().filter(|n| n.is_active()) {
            if n.order_id != order_id || !instants.insert(n.scheduled_time) {
                return Err(anyhow::anyhow!(
                    "Duplicate active notification for order: {} at: {}",
                    n.order_id,
                    n.scheduled_time
                ));
            }
        }

        let mut collection = self.notifications.lock().unwrap();
        let mut canceled = Vec::new();
        for n in collection
            .iter_mut()
            .filter(|n| n.order_id == order_id && n.is_active())
        {
            canceled.push(n.clone());
            n.cancel(canceled_at);
            n.version += 1;
        }
        collection.extend(notifications.iter().cloned());

        Ok(canceled)
    }

    async fn find(&self, notification_id: &ID) -> Option<Notification> {
        find(notification_id, &self.notifications)
    }

    async fn find_by_order(&self, order_id: &str) -> Vec<Notification> {
        let mut notifications = find_by(&self.notifications, |n| n.order_id == order_id);
        notifications.sort_by_key(|n| n.scheduled_time);
        notifications
    }

    async fn find_due(&self, before: DateTime<Utc>) -> anyhow::Result<Vec<Notification>> {
        let mut notifications = find_by(&self.notifications, |n| {
            n.state == NotificationState::Queued && n.is_due(before)
        });
        notifications.sort_by_key(|n| n.scheduled_time);
        Ok(notifications)
    }

    async fn save(&self, notification: &Notification) -> anyhow::Result<()> {
        let mut stored = notification.clone();
        stored.version += 1;
        save(&stored, &self.notifications);
        Ok(())
    }

    async fn update_if_current(
        &self,
        notification: &Notification,
    ) -> anyhow::Result<Option<Notification>> {
        let mut collection = self.notifications.lock().unwrap();
        let index = match collection
            .iter()
            .position(|n| n.id == notification.id && n.version == notification.version)
        {
            Some(index) => index,
            None => return Ok(None),
        };
        if notification.is_active()
            && collection.iter().any(|n| {
                n.id != notification.id
                    && n.is_active()
                    && n.order_id == notification.order_id
                    && n.scheduled_time == notification.scheduled_time
            })
        {
            return Err(anyhow::anyhow!(
                "Duplicate active notification for order: {} at: {}",
                notification.order_id,
                notification.scheduled_time
            ));
        }

        let mut stored = notification.clone();
        stored.version += 1;
        collection[index] = stored.clone();
        Ok(Some(stored))
    }

    async fn delete(&self, notification_id: &ID) -> Option<Notification> {
        delete(notification_id, &self.notifications)
    }

    async fn delete_sent_before(&self, before: DateTime<Utc>) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.notifications, |n| {
            n.state == NotificationState::Sent && n.sent_at.map(|t| t < before).unwrap_or(false)
        }))
    }
}
