pub mod dispatch_due_notifications;
pub mod promote_notification;
pub mod propagate_notification_update;
mod reschedule_notification;

use actix_web::web;
use reschedule_notification::reschedule_notification_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notifications/{notification_id}",
        web::put().to(reschedule_notification_controller),
    );
}
