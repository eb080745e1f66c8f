mod telemetry;

use order_reminders_api::Application;
use order_reminders_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("order_reminders_server".into(), "info".into());
    init_subscriber(subscriber);

    let (context, receivers) = setup_context()
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let app = Application::new(context, receivers).await?;
    app.start().await
}
