use crate::{
    notification::{
        dispatch_due_notifications::DispatchDueNotificationsUseCase,
        promote_notification::PromoteNotificationUseCase,
        propagate_notification_update::PropagateNotificationUpdateUseCase,
    },
    order::reconcile_order_reminders::ReconcileOrderRemindersUseCase,
    shared::usecase::execute,
};
use actix_web::rt::time::{interval, sleep};
use order_reminders_domain::{NotificationChange, OrderChange};
use order_reminders_infra::ReminderContext;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

/// Seconds until the next multiple of `period_secs` since the epoch, so that
/// sweeps happen on wall clock boundaries, e.g. 12:00, 12:15, 12:30.
pub fn get_start_delay(now_millis: i64, period_secs: u64) -> u64 {
    let now_secs = (now_millis / 1000) as u64;
    period_secs - now_secs % period_secs
}

/// Reconciles the reminders of every order change on the order feed.
/// Changes are handled concurrently, one task per change.
pub fn start_order_feed_worker(ctx: ReminderContext, mut orders: UnboundedReceiver<OrderChange>) {
    actix_web::rt::spawn(async move {
        while let Some(change) = orders.recv().await {
            let ctx = ctx.clone();
            actix_web::rt::spawn(async move {
                let usecase = ReconcileOrderRemindersUseCase { change };
                // Errors are logged by execute and the change counts as handled
                let _ = execute(usecase, &ctx).await;
            });
        }
        info!("Order feed closed");
    });
}

pub fn start_notification_feed_worker(
    ctx: ReminderContext,
    mut notifications: UnboundedReceiver<NotificationChange>,
) {
    actix_web::rt::spawn(async move {
        while let Some(change) = notifications.recv().await {
            let ctx = ctx.clone();
            actix_web::rt::spawn(handle_notification_change(change, ctx));
        }
        info!("Notification feed closed");
    });
}

async fn handle_notification_change(change: NotificationChange, ctx: ReminderContext) {
    match change {
        NotificationChange::Created(notification) => {
            let usecase = PromoteNotificationUseCase {
                notification_id: notification.id,
            };
            let _ = execute(usecase, &ctx).await;
        }
        NotificationChange::Updated { before, after } => {
            let usecase = PropagateNotificationUpdateUseCase { before, after };
            let _ = execute(usecase, &ctx).await;
        }
        NotificationChange::Deleted(notification) => {
            debug!("Notification: {} was deleted", notification.id);
        }
    }
}

pub fn start_dispatch_job(ctx: ReminderContext) {
    actix_web::rt::spawn(async move {
        let period_secs = ctx.config.dispatch_interval_secs;
        let secs_to_next_run = get_start_delay(ctx.sys.get_timestamp_millis(), period_secs);
        sleep(Duration::from_secs(secs_to_next_run)).await;

        let mut dispatch_interval = interval(Duration::from_secs(period_secs));
        loop {
            dispatch_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(async move {
                let _ = execute(DispatchDueNotificationsUseCase, &context).await;
            });
        }
    });
}
