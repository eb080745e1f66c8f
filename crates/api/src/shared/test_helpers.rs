use chrono::{DateTime, Utc};
use order_reminders_domain::{parse_instant, Tz, User};
use order_reminders_infra::{
    Config, FeedReceivers, ISys, InMemoryPushGateway, ReminderContext,
};
use std::sync::Arc;

/// Clock that is stuck at the given instant
pub struct StaticTimeSys(pub DateTime<Utc>);

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    fn get_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct TestContext {
    pub ctx: ReminderContext,
    pub receivers: FeedReceivers,
    pub push: Arc<InMemoryPushGateway>,
}

impl TestContext {
    pub fn set_now(&mut self, datestr: &str) {
        self.ctx.sys = Arc::new(StaticTimeSys(instant(datestr)));
    }

    pub async fn add_device(&self, token: &str) {
        self.ctx
            .repos
            .users
            .insert(&User::new(Some(token.to_string())))
            .await
            .unwrap();
    }
}

pub fn instant(datestr: &str) -> DateTime<Utc> {
    parse_instant(datestr).expect("Valid test timestamp")
}

/// In memory context stuck at 2025-04-01 14:00 in Kolkata
pub fn setup() -> TestContext {
    let mut config = Config::new();
    config.reminder_timezone = Tz::Asia__Kolkata;
    config.sent_retention_millis = 24 * 60 * 60 * 1000;

    let (mut ctx, receivers) = ReminderContext::create_inmemory(config);
    let push = Arc::new(InMemoryPushGateway::new());
    ctx.push = push.clone();
    ctx.sys = Arc::new(StaticTimeSys(instant("2025-04-01T14:00:00+05:30")));

    TestContext {
        ctx,
        receivers,
        push,
    }
}
