use crate::shared::usecase::UseCase;
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use order_reminders_domain::Notification;
use order_reminders_infra::{PushMessage, ReminderContext};
use tracing::{error, info, warn};

/// One sweep of the dispatcher. Sends every queued notification that is due
/// and purges the ones that were delivered longer ago than the retention
/// window.
#[derive(Debug)]
pub struct DispatchDueNotificationsUseCase;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
    pub purged: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchDueNotificationsUseCase {
    type Response = DispatchReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchDueNotifications";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_datetime();
        let mut report = self.send_due(ctx, now).await?;
        report.purged = self.purge_sent(ctx, now).await;

        info!("Dispatch sweep finished: {:?}", report);
        Ok(report)
    }
}

impl DispatchDueNotificationsUseCase {
    async fn send_due(
        &self,
        ctx: &ReminderContext,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport, UseCaseError> {
        let due = ctx
            .repos
            .notifications
            .find_due(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if due.is_empty() {
            info!("No notifications are due");
            return Ok(DispatchReport::default());
        }

        let tokens = ctx
            .repos
            .users
            .find_device_tokens()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if tokens.is_empty() {
            warn!(
                "No device tokens to send the {} due notifications to",
                due.len()
            );
            return Ok(DispatchReport {
                due: due.len(),
                ..Default::default()
            });
        }

        let results = join_all(due.iter().map(|n| send(ctx, &tokens, n, now))).await;
        let sent = results.iter().filter(|sent| **sent).count();

        Ok(DispatchReport {
            due: due.len(),
            sent,
            failed: due.len() - sent,
            purged: 0,
        })
    }

    async fn purge_sent(&self, ctx: &ReminderContext, now: DateTime<Utc>) -> i64 {
        let before = now - Duration::milliseconds(ctx.config.sent_retention_millis);
        match ctx.repos.notifications.delete_sent_before(before).await {
            Ok(res) => res.deleted_count,
            Err(e) => {
                error!("Unable to purge sent notifications. Error: {:?}", e);
                0
            }
        }
    }
}

/// Returns whether the push gateway accepted the notification
async fn send(
    ctx: &ReminderContext,
    tokens: &[String],
    notification: &Notification,
    now: DateTime<Utc>,
) -> bool {
    if let Err(e) = ctx
        .push
        .send(tokens, &PushMessage::from(notification))
        .await
    {
        error!(
            "Unable to send notification: {}, it stays queued. Error: {:?}",
            notification.id, e
        );
        return false;
    }

    let mut sent = notification.clone();
    sent.mark_sent(now);
    match ctx
        .repos
        .notifications
        .update_if_current(&sent)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => warn!(
            "Notification: {} was changed while it was being sent, it is kept as changed",
            notification.id
        ),
        Err(e) => error!(
            "Notification: {} was sent but could not be marked as sent. Error: {:?}",
            notification.id, e
        ),
    }
    true
}
