use order_reminders_domain::{NotificationChange, OrderChange};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::warn;

/// Publishing side of the change feeds.
///
/// Order changes come from the order management system, notification
/// changes are published after notifications have been written.
#[derive(Clone)]
pub struct Feeds {
    orders: UnboundedSender<OrderChange>,
    notifications: UnboundedSender<NotificationChange>,
}

/// Consuming side of the change feeds, taken by the feed workers
pub struct FeedReceivers {
    pub orders: UnboundedReceiver<OrderChange>,
    pub notifications: UnboundedReceiver<NotificationChange>,
}

pub fn create_feeds() -> (Feeds, FeedReceivers) {
    let (orders_tx, orders_rx) = unbounded_channel();
    let (notifications_tx, notifications_rx) = unbounded_channel();
    (
        Feeds {
            orders: orders_tx,
            notifications: notifications_tx,
        },
        FeedReceivers {
            orders: orders_rx,
            notifications: notifications_rx,
        },
    )
}

impl Feeds {
    pub fn publish_order_change(&self, change: OrderChange) {
        if let Err(e) = self.orders.send(change) {
            warn!("Order feed is closed, dropping change: {:?}", e.0);
        }
    }

    pub fn publish_notification_change(&self, change: NotificationChange) {
        if let Err(e) = self.notifications.send(change) {
            warn!("Notification feed is closed, dropping change: {:?}", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_reminders_domain::{OrderSnapshot, OrderStatus};

    #[tokio::test]
    async fn delivers_changes_in_publish_order() {
        let (feeds, mut receivers) = create_feeds();
        for order_id in ["1", "2"] {
            feeds.publish_order_change(OrderChange {
                order_id: order_id.into(),
                before: None,
                after: Some(OrderSnapshot {
                    scheduled_time: "2025-04-11T14:00:00Z".into(),
                    status: OrderStatus::Upcoming,
                    client_name: "Ada".into(),
                }),
            });
        }
        assert_eq!(receivers.orders.recv().await.unwrap().order_id, "1");
        assert_eq!(receivers.orders.recv().await.unwrap().order_id, "2");
        assert!(receivers.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn publishing_to_a_closed_feed_does_not_panic() {
        let (feeds, receivers) = create_feeds();
        drop(receivers);
        feeds.publish_order_change(OrderChange {
            order_id: "1".into(),
            before: None,
            after: None,
        });
    }
}
