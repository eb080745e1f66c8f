use crate::shared::usecase::{Subscriber, UseCase};
use order_reminders_domain::{
    InvalidScheduleInput, Notification, NotificationChange, OrderChange, ReconcileAction,
    ReminderPlan,
};
use order_reminders_infra::ReminderContext;
use tracing::{error, info};

/// Brings the reminders of an order in line with a change to the order.
///
/// Creating or moving an order replaces its active reminders with the ones
/// generated for the new appointment time, canceling or deleting the order
/// cancels them. Both happen as one atomic batch so that an order never has
/// reminders for two appointment times at once.
#[derive(Debug)]
pub struct ReconcileOrderRemindersUseCase {
    pub change: OrderChange,
}

#[derive(Debug)]
pub struct ReconciledReminders {
    pub action: ReconcileAction,
    /// One `Created` per new `Notification` and one `Updated` per canceled one
    pub changes: Vec<NotificationChange>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidScheduleInput(InvalidScheduleInput),
    StorageError,
}

impl From<InvalidScheduleInput> for UseCaseError {
    fn from(e: InvalidScheduleInput) -> Self {
        Self::InvalidScheduleInput(e)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ReconcileOrderRemindersUseCase {
    type Response = ReconciledReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "ReconcileOrderReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let action = self.change.reconcile_action();
        let order_id = &self.change.order_id;
        let now = ctx.sys.get_datetime();

        let created = match (action, &self.change.after) {
            (ReconcileAction::Ignore, _) => {
                return Ok(ReconciledReminders {
                    action,
                    changes: Vec::new(),
                })
            }
            (ReconcileAction::Regenerate, Some(after)) => ReminderPlan::generate(
                &after.scheduled_time,
                now,
                &after.client_name,
                &ctx.config.reminder_timezone,
            )?
            .into_iter()
            .map(|reminder| Notification::new(order_id, reminder, now))
            .collect::<Vec<_>>(),
            _ => Vec::new(),
        };

        let canceled = ctx
            .repos
            .notifications
            .replace_for_order(order_id, now, &created)
            .await
            .map_err(|e| {
                error!(
                    "Unable to reconcile reminders for order: {}. Error: {:?}",
                    order_id, e
                );
                UseCaseError::StorageError
            })?;

        info!(
            "Reconciled reminders for order: {}. Canceled: {}, created: {}",
            order_id,
            canceled.len(),
            created.len()
        );

        let changes = canceled
            .into_iter()
            .map(|before| {
                let mut after = before.clone();
                after.cancel(now);
                NotificationChange::Updated { before, after }
            })
            .chain(created.into_iter().map(NotificationChange::Created))
            .collect();

        Ok(ReconciledReminders { action, changes })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(PublishReconciledNotifications)]
    }
}

pub struct PublishReconciledNotifications;

#[async_trait::async_trait(?Send)]
impl Subscriber<ReconcileOrderRemindersUseCase> for PublishReconciledNotifications {
    async fn notify(&self, e: &ReconciledReminders, ctx: &ReminderContext) {
        for change in &e.changes {
            ctx.feeds.publish_notification_change(change.clone());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::{
        test_helpers::{instant, setup},
        usecase::execute,
    };
    use order_reminders_domain::{NotificationState, OrderSnapshot, OrderStatus};
    use std::collections::HashSet;

    const T1: &str = "2025-04-11T14:00:00+05:30";
    const T2: &str = "2025-04-13T09:30:00+05:30";

    fn snapshot(scheduled_time: &str, status: OrderStatus) -> OrderSnapshot {
        OrderSnapshot {
            scheduled_time: scheduled_time.into(),
            status,
            client_name: "Ada".into(),
        }
    }

    fn usecase(
        before: Option<OrderSnapshot>,
        after: Option<OrderSnapshot>,
    ) -> ReconcileOrderRemindersUseCase {
        ReconcileOrderRemindersUseCase {
            change: OrderChange {
                order_id: "order-1".into(),
                before,
                after,
            },
        }
    }

    #[actix_web::test]
    async fn creates_a_scheduled_notification_per_reminder() {
        let mut t = setup();

        let res = execute(
            usecase(None, Some(snapshot(T1, OrderStatus::Upcoming))),
            &t.ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.action, ReconcileAction::Regenerate);
        assert_eq!(res.changes.len(), 16);

        let stored = t.ctx.repos.notifications.find_by_order("order-1").await;
        assert_eq!(stored.len(), 16);
        assert!(stored.iter().all(|n| n.state == NotificationState::Scheduled));

        // Every new notification is published for promotion
        let mut published = 0;
        while let Ok(change) = t.receivers.notifications.try_recv() {
            assert!(matches!(change, NotificationChange::Created(_)));
            published += 1;
        }
        assert_eq!(published, 16);
    }

    #[actix_web::test]
    async fn cancels_every_active_notification_when_the_order_is_canceled() {
        let mut t = setup();
        let mut create = usecase(None, Some(snapshot(T1, OrderStatus::Upcoming)));
        create.execute(&t.ctx).await.unwrap();

        let res = execute(
            usecase(
                Some(snapshot(T1, OrderStatus::Upcoming)),
                Some(snapshot(T1, OrderStatus::Canceled)),
            ),
            &t.ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.action, ReconcileAction::Cancel);
        assert_eq!(res.changes.len(), 16);

        let stored = t.ctx.repos.notifications.find_by_order("order-1").await;
        assert!(stored.iter().all(|n| n.state == NotificationState::Canceled));
        let far_future = instant("2030-01-01T00:00:00Z");
        assert!(t
            .ctx
            .repos
            .notifications
            .find_due(far_future)
            .await
            .unwrap()
            .is_empty());

        while let Ok(change) = t.receivers.notifications.try_recv() {
            match change {
                NotificationChange::Updated { before, after } => {
                    assert_eq!(before.state, NotificationState::Scheduled);
                    assert_eq!(after.state, NotificationState::Canceled);
                }
                other => panic!("Unexpected change: {:?}", other),
            }
        }
    }

    #[actix_web::test]
    async fn cancellation_is_idempotent() {
        let t = setup();
        let mut create = usecase(None, Some(snapshot(T1, OrderStatus::Upcoming)));
        create.execute(&t.ctx).await.unwrap();

        let mut delete = usecase(Some(snapshot(T1, OrderStatus::Upcoming)), None);
        let first = delete.execute(&t.ctx).await.unwrap();
        assert_eq!(first.changes.len(), 16);
        let after_first = t.ctx.repos.notifications.find_by_order("order-1").await;

        let second = delete.execute(&t.ctx).await.unwrap();
        assert!(second.changes.is_empty());
        assert_eq!(
            t.ctx.repos.notifications.find_by_order("order-1").await,
            after_first
        );
    }

    #[actix_web::test]
    async fn moving_the_order_converges_to_the_new_plan() {
        let t = setup();
        let mut create = usecase(None, Some(snapshot(T1, OrderStatus::Upcoming)));
        create.execute(&t.ctx).await.unwrap();

        let mut reschedule = usecase(
            Some(snapshot(T1, OrderStatus::Upcoming)),
            Some(snapshot(T2, OrderStatus::Upcoming)),
        );
        reschedule.execute(&t.ctx).await.unwrap();

        let expected = ReminderPlan::generate(
            T2,
            t.ctx.sys.get_datetime(),
            "Ada",
            &t.ctx.config.reminder_timezone,
        )
        .unwrap()
        .into_iter()
        .map(|r| r.remind_at)
        .collect::<HashSet<_>>();

        let active = t
            .ctx
            .repos
            .notifications
            .find_by_order("order-1")
            .await
            .into_iter()
            .filter(|n| n.is_active())
            .map(|n| n.scheduled_time)
            .collect::<HashSet<_>>();
        assert_eq!(active, expected);

        // Redelivering the same change does not duplicate anything
        reschedule.execute(&t.ctx).await.unwrap();
        let active_count = t
            .ctx
            .repos
            .notifications
            .find_by_order("order-1")
            .await
            .iter()
            .filter(|n| n.is_active())
            .count();
        assert_eq!(active_count, expected.len());
    }

    #[actix_web::test]
    async fn ignores_changes_that_do_not_affect_reminders() {
        let t = setup();
        let mut create = usecase(None, Some(snapshot(T1, OrderStatus::Upcoming)));
        create.execute(&t.ctx).await.unwrap();

        let mut rename = usecase(
            Some(snapshot(T1, OrderStatus::Upcoming)),
            Some(OrderSnapshot {
                client_name: "Grace".into(),
                ..snapshot(T1, OrderStatus::Upcoming)
            }),
        );
        let res = rename.execute(&t.ctx).await.unwrap();
        assert_eq!(res.action, ReconcileAction::Ignore);
        assert!(res.changes.is_empty());
        assert_eq!(t.ctx.repos.notifications.find_by_order("order-1").await.len(), 16);
    }

    #[actix_web::test]
    async fn rejects_appointments_without_offset() {
        let t = setup();
        let mut create = usecase(
            None,
            Some(snapshot("2025-04-11T14:00:00", OrderStatus::Upcoming)),
        );
        let res = create.execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::InvalidScheduleInput(_))));
        assert!(t
            .ctx
            .repos
            .notifications
            .find_by_order("order-1")
            .await
            .is_empty());
    }
}
