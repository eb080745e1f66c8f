use crate::{
    error::ApiError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use order_reminders_api_structs::get_order_notifications::*;
use order_reminders_domain::Notification;
use order_reminders_infra::ReminderContext;

pub async fn get_order_notifications_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<ReminderContext>,
) -> Result<HttpResponse, ApiError> {
    let usecase = GetOrderNotificationsUseCase {
        order_id: path_params.into_inner().order_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|notifications| HttpResponse::Ok().json(APIResponse::new(notifications)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
struct GetOrderNotificationsUseCase {
    order_id: String,
}

#[derive(Debug)]
enum UseCaseError {}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetOrderNotificationsUseCase {
    type Response = Vec<Notification>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetOrderNotifications";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.notifications.find_by_order(&self.order_id).await)
    }
}
