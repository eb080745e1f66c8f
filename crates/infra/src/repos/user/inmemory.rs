use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use order_reminders_domain::User;

pub struct InMemoryUserRepo {
    users: std::sync::Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(vec![]),
        }
    }
}

impl Default for InMemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        insert(user, &self.users);
        Ok(())
    }

    async fn find_device_tokens(&self) -> anyhow::Result<Vec<String>> {
        Ok(find_by(&self.users, |u| {
            u.device_token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
        })
        .into_iter()
        .filter_map(|u| u.device_token)
        .collect())
    }
}
