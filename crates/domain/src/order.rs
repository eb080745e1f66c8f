use crate::date::parse_instant;
use serde::{Deserialize, Serialize};

/// Status of an order as reported by the order management system.
/// Only the variants that affect reminders are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Upcoming,
    Completed,
    Canceled,
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Whether an order in this status should have reminders
    pub fn wants_reminders(&self) -> bool {
        matches!(self, Self::Upcoming | Self::Completed)
    }
}

/// The fields of an order that reminders are derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    /// Appointment time as an RFC 3339 timestamp with explicit offset
    pub scheduled_time: String,
    pub status: OrderStatus,
    pub client_name: String,
}

impl OrderSnapshot {
    /// Compares appointment times as instants when both parse, so that the
    /// same instant written with different offsets is not a change.
    fn same_scheduled_time(&self, other: &Self) -> bool {
        match (
            parse_instant(&self.scheduled_time),
            parse_instant(&other.scheduled_time),
        ) {
            (Ok(t1), Ok(t2)) => t1 == t2,
            _ => self.scheduled_time == other.scheduled_time,
        }
    }
}

/// A write to an order. `before` is `None` for creations and `after` is
/// `None` for deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderChange {
    pub order_id: String,
    pub before: Option<OrderSnapshot>,
    pub after: Option<OrderSnapshot>,
}

/// What reconciling an `OrderChange` has to do with the reminders of the order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Cancel every active reminder of the order
    Cancel,
    /// Cancel every active reminder and create the ones for `after`
    Regenerate,
    /// Leave the reminders as they are
    Ignore,
}

impl OrderChange {
    pub fn reconcile_action(&self) -> ReconcileAction {
        let after = match &self.after {
            Some(after) => after,
            None => return ReconcileAction::Cancel,
        };

        if after.status == OrderStatus::Canceled {
            return match &self.before {
                Some(before) if before.status == OrderStatus::Canceled => ReconcileAction::Ignore,
                _ => ReconcileAction::Cancel,
            };
        }

        if !after.status.wants_reminders() {
            return ReconcileAction::Ignore;
        }

        match &self.before {
            None => ReconcileAction::Regenerate,
            Some(before) if before.status != after.status => ReconcileAction::Regenerate,
            Some(before) if !before.same_scheduled_time(after) => ReconcileAction::Regenerate,
            Some(_) => ReconcileAction::Ignore,
        }
    }
}
