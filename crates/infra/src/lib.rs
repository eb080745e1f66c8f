mod config;
mod feed;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use feed::{create_feeds, FeedReceivers, Feeds};
pub use repos::{DeleteResult, INotificationRepo, IUserRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};
use tracing::info;

#[derive(Clone)]
pub struct ReminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub push: Arc<dyn IPushGateway>,
    pub feeds: Feeds,
}

impl ReminderContext {
    async fn create(config: Config) -> anyhow::Result<(Self, FeedReceivers)> {
        let repos = match &config.database_url {
            Some(url) => Repos::create_postgres(url).await?,
            None => {
                info!("Did not find DATABASE_URL environment variable. Using in memory repositories.");
                Repos::create_inmemory()
            }
        };
        let push: Arc<dyn IPushGateway> = match &config.fcm_service_account_file {
            Some(path) => Arc::new(FcmPushGateway::new(ServiceAccount::from_file(path)?)?),
            None => {
                info!("Did not find GOOGLE_APPLICATION_CREDENTIALS environment variable. Push notifications will only be recorded in memory.");
                Arc::new(InMemoryPushGateway::new())
            }
        };
        let (feeds, receivers) = create_feeds();
        Ok((
            Self {
                repos,
                config,
                sys: Arc::new(RealSys {}),
                push,
                feeds,
            },
            receivers,
        ))
    }

    /// Context with in memory repositories and push gateway
    pub fn create_inmemory(config: Config) -> (Self, FeedReceivers) {
        let (feeds, receivers) = create_feeds();
        (
            Self {
                repos: Repos::create_inmemory(),
                config,
                sys: Arc::new(RealSys {}),
                push: Arc::new(InMemoryPushGateway::new()),
                feeds,
            },
            receivers,
        )
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<(ReminderContext, FeedReceivers)> {
    ReminderContext::create(Config::new()).await
}
