use crate::{
    error::ApiError,
    shared::{
        auth::protect_feed_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use order_reminders_api_structs::reschedule_notification::*;
use order_reminders_domain::{
    parse_instant, InvalidScheduleInput, Notification, NotificationChange, NotificationState, ID,
};
use order_reminders_infra::ReminderContext;

pub async fn reschedule_notification_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ApiError> {
    protect_feed_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = RescheduleNotificationUseCase {
        notification_id: path_params.into_inner().notification_id,
        scheduled_time: body.scheduled_time,
        title: body.title,
        body: body.body,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.after)))
        .map_err(ApiError::from)
}

/// Moves a single `Notification` to another time and optionally changes its
/// content
#[derive(Debug)]
pub struct RescheduleNotificationUseCase {
    pub notification_id: ID,
    pub scheduled_time: String,
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub before: Notification,
    pub after: Notification,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Canceled(ID),
    ConcurrentUpdate(ID),
    InstantTaken(ID),
    InvalidScheduleInput(InvalidScheduleInput),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("A notification with id: {}, was not found.", id))
            }
            UseCaseError::Canceled(id) => Self::Conflict(format!(
                "The notification with id: {} is canceled and can not be rescheduled.",
                id
            )),
            UseCaseError::ConcurrentUpdate(id) => Self::Conflict(format!(
                "The notification with id: {} was changed during the update, please retry.",
                id
            )),
            UseCaseError::InstantTaken(id) => Self::Conflict(format!(
                "The order of the notification with id: {} already has a reminder at the given time.",
                id
            )),
            UseCaseError::InvalidScheduleInput(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RescheduleNotificationUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "RescheduleNotification";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let scheduled_time =
            parse_instant(&self.scheduled_time).map_err(UseCaseError::InvalidScheduleInput)?;

        let before = match ctx.repos.notifications.find(&self.notification_id).await {
            Some(n) => n,
            None => return Err(UseCaseError::NotFound(self.notification_id.clone())),
        };
        if before.state == NotificationState::Canceled {
            return Err(UseCaseError::Canceled(before.id));
        }

        let mut after = before.clone();
        after.scheduled_time = scheduled_time;
        if let Some(title) = &self.title {
            after.title = title.clone();
        }
        if let Some(body) = &self.body {
            after.body = body.clone();
        }

        // A rescheduled `Sent` notification is queued again, so the instant
        // has to be free whatever the current state is
        let instant_taken = ctx
            .repos
            .notifications
            .find_by_order(&before.order_id)
            .await
            .iter()
            .any(|n| n.id != before.id && n.is_active() && n.scheduled_time == scheduled_time);
        if instant_taken {
            return Err(UseCaseError::InstantTaken(before.id));
        }

        let after = ctx
            .repos
            .notifications
            .update_if_current(&after)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::ConcurrentUpdate(before.id.clone()))?;

        Ok(UseCaseRes { before, after })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(PublishRescheduledNotification)]
    }
}

pub struct PublishRescheduledNotification;

#[async_trait::async_trait(?Send)]
impl Subscriber<RescheduleNotificationUseCase> for PublishRescheduledNotification {
    async fn notify(&self, e: &UseCaseRes, ctx: &ReminderContext) {
        ctx.feeds
            .publish_notification_change(NotificationChange::Updated {
                before: e.before.clone(),
                after: e.after.clone(),
            });
    }
}
