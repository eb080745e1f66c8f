use order_reminders_api::Application;
use order_reminders_domain::Tz;
use order_reminders_infra::{Config, ReminderContext};
use order_reminders_sdk::OrderRemindersSDK;

pub struct TestApp {
    pub config: Config,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, OrderRemindersSDK, String) {
    let mut config = Config::new();
    config.port = 0; // Random port
    config.reminder_timezone = Tz::UTC;

    let (ctx, receivers) = ReminderContext::create_inmemory(config.clone());
    let application = Application::new(ctx, receivers)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = OrderRemindersSDK::new(address.clone(), config.feed_secret.clone());
    let app = TestApp { config };
    (app, sdk, address)
}
