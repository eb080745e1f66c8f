use crate::{
    reminder::PlannedReminder,
    shared::entity::{Entity, ID},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Lifecycle of a `Notification`.
///
/// `Scheduled` and `Queued` are the active states. `Canceled` is terminal,
/// a canceled `Notification` is never reactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationState {
    /// The reminder ought to exist but has not been promoted yet
    Scheduled,
    /// Waiting for the dispatcher to send it once it is due
    Queued,
    /// Delivery was confirmed by the push gateway
    Sent,
    Canceled,
}

impl NotificationState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Queued)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Queued => "queued",
            Self::Sent => "sent",
            Self::Canceled => "canceled",
        }
    }
}

impl Display for NotificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Notification state: {0} is not valid")]
pub struct InvalidNotificationStateError(String);

impl FromStr for NotificationState {
    type Err = InvalidNotificationStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "queued" => Ok(Self::Queued),
            "sent" => Ok(Self::Sent),
            "canceled" => Ok(Self::Canceled),
            _ => Err(InvalidNotificationStateError(s.to_string())),
        }
    }
}

/// A reminder for an order that should be pushed to the registered devices
/// at `scheduled_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: ID,
    /// Identifier of the order this `Notification` reminds about
    pub order_id: String,
    pub title: String,
    pub body: String,
    pub scheduled_time: DateTime<Utc>,
    pub state: NotificationState,
    pub created_at: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    /// Bumped by the store on every write. Conditional updates only go
    /// through when the stored version still matches.
    pub version: i64,
}

impl Notification {
    pub fn new(order_id: &str, reminder: PlannedReminder, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            order_id: order_id.to_string(),
            title: reminder.title,
            body: reminder.body,
            scheduled_time: reminder.remind_at,
            state: NotificationState::Scheduled,
            created_at,
            canceled_at: None,
            sent_at: None,
            version: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_time <= now
    }

    /// Hands the `Notification` over to the dispatcher
    pub fn queue(&mut self) {
        self.state = NotificationState::Queued;
        self.sent_at = None;
    }

    pub fn mark_sent(&mut self, sent_at: DateTime<Utc>) {
        self.state = NotificationState::Sent;
        self.sent_at = Some(sent_at);
    }

    /// Cancels the `Notification`. Canceling twice keeps the first
    /// cancellation time.
    pub fn cancel(&mut self, canceled_at: DateTime<Utc>) {
        if self.state != NotificationState::Canceled {
            self.state = NotificationState::Canceled;
            self.canceled_at = Some(canceled_at);
        }
    }
}

impl Entity for Notification {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn notification() -> Notification {
        let reminder = PlannedReminder {
            remind_at: Utc.with_ymd_and_hms(2025, 4, 8, 6, 0, 0).unwrap(),
            title: "Order Reminder".into(),
            body: "Upcoming order".into(),
        };
        Notification::new("order-1", reminder, Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn starts_scheduled() {
        let n = notification();
        assert_eq!(n.state, NotificationState::Scheduled);
        assert!(n.is_active());
        assert_eq!(n.order_id, "order-1");
        assert!(n.is_due(n.scheduled_time));
        assert!(!n.is_due(n.created_at));
    }

    #[test]
    fn cancel_is_terminal_and_keeps_first_timestamp() {
        let mut n = notification();
        let first = Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap();
        n.cancel(first);
        n.cancel(Utc.with_ymd_and_hms(2025, 4, 3, 0, 0, 0).unwrap());
        assert_eq!(n.state, NotificationState::Canceled);
        assert_eq!(n.canceled_at, Some(first));
        assert!(!n.is_active());
    }

    #[test]
    fn requeue_clears_sent_timestamp() {
        let mut n = notification();
        n.mark_sent(n.scheduled_time);
        assert_eq!(n.state, NotificationState::Sent);
        assert!(!n.is_active());
        n.queue();
        assert_eq!(n.state, NotificationState::Queued);
        assert_eq!(n.sent_at, None);
    }

    #[test]
    fn parses_stored_states() {
        assert_eq!(
            "queued".parse::<NotificationState>().unwrap(),
            NotificationState::Queued
        );
        assert!("pending".parse::<NotificationState>().is_err());
    }
}
