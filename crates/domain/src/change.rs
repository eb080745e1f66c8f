use crate::notification::Notification;

/// A write to a `Notification`, published after it has been persisted
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationChange {
    Created(Notification),
    Updated {
        before: Notification,
        after: Notification,
    },
    Deleted(Notification),
}

