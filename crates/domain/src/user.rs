use crate::shared::entity::{Entity, ID};

/// A user of the app. Every device token registered by a user receives
/// the order reminders.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub device_token: Option<String>,
}

impl User {
    pub fn new(device_token: Option<String>) -> Self {
        Self {
            id: Default::default(),
            device_token,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
