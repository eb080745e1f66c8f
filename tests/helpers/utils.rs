use actix_web::rt::time::sleep;
use chrono::{Duration, SecondsFormat, Utc};
use order_reminders_sdk::{NotificationDTO, OrderRemindersSDK};

/// `hour`:00 UTC on the day `days` from today, as sent by the order system
pub fn appointment_in_days(days: i64, hour: u32) -> String {
    let date = (Utc::now() + Duration::days(days)).date_naive();
    date.and_hms_opt(hour, 0, 0)
        .expect("Valid time")
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Reconciliation runs in the background, so poll until `done` holds
pub async fn wait_for_notifications<F>(
    sdk: &OrderRemindersSDK,
    order_id: &str,
    done: F,
) -> Vec<NotificationDTO>
where
    F: Fn(&[NotificationDTO]) -> bool,
{
    for _ in 0..100 {
        let notifications = sdk
            .order
            .notifications(order_id.to_string())
            .await
            .expect("To list notifications")
            .notifications;
        if done(&notifications) {
            return notifications;
        }
        sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("Notifications of order: {} did not settle", order_id);
}
