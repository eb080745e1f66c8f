mod change;
mod date;
mod notification;
mod order;
mod reminder;
mod shared;
mod user;

pub use change::NotificationChange;
pub use date::{format_instant, instant_format, parse_instant, InvalidScheduleInput};
pub use notification::{InvalidNotificationStateError, Notification, NotificationState};
pub use order::{OrderChange, OrderSnapshot, OrderStatus, ReconcileAction};
pub use reminder::{
    PlannedReminder, ReminderPlan, MAX_DISPATCH_INTERVAL_MINUTES, REMINDER_TITLE,
    SAME_DAY_REMINDER_TITLE,
};
pub use shared::entity::{Entity, ID};
pub use user::User;

pub use chrono_tz::Tz;
