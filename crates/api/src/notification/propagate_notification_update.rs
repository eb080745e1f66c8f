use crate::shared::usecase::{Subscriber, UseCase};
use order_reminders_domain::{Notification, NotificationChange, NotificationState};
use order_reminders_infra::ReminderContext;
use tracing::info;

/// Reacts to an updated `Notification`. Canceled notifications are removed
/// and rescheduled ones are queued again.
#[derive(Debug)]
pub struct PropagateNotificationUpdateUseCase {
    pub before: Notification,
    pub after: Notification,
}

#[derive(Debug, PartialEq)]
pub enum PropagationOutcome {
    Deleted(Notification),
    Requeued,
    AlreadyQueued,
    Ignored,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for PropagateNotificationUpdateUseCase {
    type Response = PropagationOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "PropagateNotificationUpdate";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        if self.after.state == NotificationState::Canceled {
            if self.before.state == NotificationState::Canceled {
                return Ok(PropagationOutcome::Ignored);
            }
            return Ok(match ctx.repos.notifications.delete(&self.after.id).await {
                Some(deleted) => PropagationOutcome::Deleted(deleted),
                None => PropagationOutcome::Ignored,
            });
        }

        if self.before.scheduled_time == self.after.scheduled_time {
            return Ok(PropagationOutcome::Ignored);
        }

        let current = match ctx.repos.notifications.find(&self.after.id).await {
            Some(n) => n,
            None => return Ok(PropagationOutcome::Ignored),
        };
        let now = ctx.sys.get_datetime();

        match current.state {
            NotificationState::Queued => Ok(PropagationOutcome::AlreadyQueued),
            NotificationState::Scheduled | NotificationState::Sent
                if current.scheduled_time > now =>
            {
                let mut requeued = current;
                requeued.queue();
                let stored = ctx
                    .repos
                    .notifications
                    .update_if_current(&requeued)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                if stored.is_some() {
                    info!(
                        "Notification: {} rescheduled to {}, queued again",
                        requeued.id, requeued.scheduled_time
                    );
                    Ok(PropagationOutcome::Requeued)
                } else {
                    Ok(PropagationOutcome::Ignored)
                }
            }
            _ => Ok(PropagationOutcome::Ignored),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(PublishDeletedNotification)]
    }
}

pub struct PublishDeletedNotification;

#[async_trait::async_trait(?Send)]
impl Subscriber<PropagateNotificationUpdateUseCase> for PublishDeletedNotification {
    async fn notify(&self, e: &PropagationOutcome, ctx: &ReminderContext) {
        if let PropagationOutcome::Deleted(notification) = e {
            ctx.feeds
                .publish_notification_change(NotificationChange::Deleted(notification.clone()));
        }
    }
}
