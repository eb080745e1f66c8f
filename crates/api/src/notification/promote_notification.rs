use crate::shared::usecase::UseCase;
use order_reminders_domain::{Notification, NotificationState, ID};
use order_reminders_infra::{PushMessage, ReminderContext};
use tracing::{error, warn};

/// Hands a newly created `Notification` over to delivery. Reminders that are
/// already due are sent right away, the rest are queued for the dispatcher.
#[derive(Debug)]
pub struct PromoteNotificationUseCase {
    pub notification_id: ID,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// Missing, or promoted by an earlier delivery of the same event
    Skipped,
    Queued,
    Sent,
    /// Due, but there are no devices to send to. Stays `Scheduled`.
    NoRecipients,
    /// Due, but the push gateway failed. Queued so the next sweep retries.
    SendFailedQueued,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for PromoteNotificationUseCase {
    type Response = PromotionOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "PromoteNotification";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let notification = match ctx.repos.notifications.find(&self.notification_id).await {
            Some(n) if n.state == NotificationState::Scheduled => n,
            _ => return Ok(PromotionOutcome::Skipped),
        };
        let now = ctx.sys.get_datetime();

        if !notification.is_due(now) {
            let mut queued = notification.clone();
            queued.queue();
            return self.transition(ctx, &queued, PromotionOutcome::Queued).await;
        }

        let tokens = ctx
            .repos
            .users
            .find_device_tokens()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if tokens.is_empty() {
            warn!(
                "No device tokens to send notification: {} to",
                notification.id
            );
            return Ok(PromotionOutcome::NoRecipients);
        }

        let mut promoted = notification.clone();
        let outcome = match ctx
            .push
            .send(&tokens, &PushMessage::from(&notification))
            .await
        {
            Ok(_) => {
                promoted.mark_sent(now);
                PromotionOutcome::Sent
            }
            Err(e) => {
                error!(
                    "Unable to send notification: {}, queueing it for retry. Error: {:?}",
                    notification.id, e
                );
                promoted.queue();
                PromotionOutcome::SendFailedQueued
            }
        };
        self.transition(ctx, &promoted, outcome).await
    }
}

impl PromoteNotificationUseCase {
    async fn transition(
        &self,
        ctx: &ReminderContext,
        promoted: &Notification,
        outcome: PromotionOutcome,
    ) -> Result<PromotionOutcome, UseCaseError> {
        let stored = ctx
            .repos
            .notifications
            .update_if_current(promoted)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if stored.is_some() {
            return Ok(outcome);
        }
        // Canceled, rescheduled or promoted concurrently. A push that already
        // went out cannot be taken back.
        warn!(
            "Notification: {} changed while being promoted",
            promoted.id
        );
        match outcome {
            PromotionOutcome::Sent => Ok(PromotionOutcome::Sent),
            _ => Ok(PromotionOutcome::Skipped),
        }
    }
}
