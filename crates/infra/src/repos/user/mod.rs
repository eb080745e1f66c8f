mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
use order_reminders_domain::User;
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    /// Device tokens of every user that registered a device
    async fn find_device_tokens(&self) -> anyhow::Result<Vec<String>>;
}
