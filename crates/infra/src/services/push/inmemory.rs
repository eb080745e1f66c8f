use super::{IPushGateway, PushMessage};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPush {
    pub tokens: Vec<String>,
    pub message: PushMessage,
}

/// Records pushes instead of delivering them. Used in tests and when no FCM
/// server key is configured.
#[derive(Default)]
pub struct InMemoryPushGateway {
    sent: Mutex<Vec<SentPush>>,
    failing: AtomicBool,
}

impl InMemoryPushGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail until set back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IPushGateway for InMemoryPushGateway {
    async fn send(&self, tokens: &[String], message: &PushMessage) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Push gateway unavailable"));
        }
        self.sent.lock().unwrap().push(SentPush {
            tokens: tokens.to_vec(),
            message: message.clone(),
        });
        Ok(())
    }
}
