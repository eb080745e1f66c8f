mod get_order_notifications;
mod ingest_order_change;
pub mod reconcile_order_reminders;

use actix_web::web;
use get_order_notifications::get_order_notifications_controller;
use ingest_order_change::ingest_order_change_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/orders/changes",
        web::post().to(ingest_order_change_controller),
    );
    cfg.route(
        "/orders/{order_id}/notifications",
        web::get().to(get_order_notifications_controller),
    );
}
