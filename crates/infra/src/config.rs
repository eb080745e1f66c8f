use order_reminders_domain::{Tz, MAX_DISPATCH_INTERVAL_MINUTES};
use order_reminders_utils::create_random_secret;
use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret that producers of order changes have to send in the
    /// `x-feed-secret` header
    pub feed_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// How often the dispatcher sweeps for due notifications, in seconds.
    /// Must not exceed the gap between two same day reminders.
    pub dispatch_interval_secs: u64,
    /// Timezone the reminder ladder is computed in, e.g. 06:00 the day before
    /// the order is 06:00 in this timezone.
    pub reminder_timezone: Tz,
    /// How long delivered notifications are kept before they are purged
    pub sent_retention_millis: i64,
    /// Postgres connection string. In-memory repositories are used when missing.
    pub database_url: Option<String>,
    /// Path to the Google service account key file used to send with
    /// Firebase Cloud Messaging. Push notifications are only recorded in
    /// memory when missing.
    pub fcm_service_account_file: Option<String>,
}

const DEFAULT_DISPATCH_INTERVAL_MINUTES: u64 = 15;

impl Config {
    pub fn new() -> Self {
        let feed_secret = match std::env::var("FEED_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find FEED_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(16);
                info!("Secret for publishing order changes was generated and set to: {}", secret);
                secret
            }
        };
        let port = parse_env_or("PORT", 5000);

        let mut dispatch_interval_minutes =
            parse_env_or("DISPATCH_INTERVAL_MINUTES", DEFAULT_DISPATCH_INTERVAL_MINUTES);
        if dispatch_interval_minutes == 0 || dispatch_interval_minutes > MAX_DISPATCH_INTERVAL_MINUTES {
            warn!(
                "The given DISPATCH_INTERVAL_MINUTES: {} must be between 1 and {}, falling back to the default: {}.",
                dispatch_interval_minutes, MAX_DISPATCH_INTERVAL_MINUTES, DEFAULT_DISPATCH_INTERVAL_MINUTES
            );
            dispatch_interval_minutes = DEFAULT_DISPATCH_INTERVAL_MINUTES;
        }

        let reminder_timezone = parse_env_or("REMINDER_TIMEZONE", Tz::UTC);
        let sent_retention_hours: i64 = parse_env_or("SENT_RETENTION_HOURS", 24);

        Self {
            feed_secret,
            port,
            dispatch_interval_secs: dispatch_interval_minutes * 60,
            reminder_timezone,
            sent_retention_millis: sent_retention_hours * 1000 * 60 * 60,
            database_url: std::env::var("DATABASE_URL").ok(),
            fcm_service_account_file: std::env::var("GOOGLE_APPLICATION_CREDENTIALS").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env_or<T: FromStr + Display>(key: &str, default: T) -> T {
    let value = match std::env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                key, value, default
            );
            default
        }
    }
}
