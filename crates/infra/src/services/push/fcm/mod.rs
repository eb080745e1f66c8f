mod auth_provider;

use super::{IPushGateway, PushMessage};
pub use auth_provider::ServiceAccount;
use auth_provider::AccessTokenProvider;
use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

// https://firebase.google.com/docs/reference/fcm/rest/v1/projects.messages

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FcmData<'a> {
    order_id: &'a str,
}

#[derive(Debug, Serialize)]
struct AndroidNotification {
    sound: &'static str,
}

#[derive(Debug, Serialize)]
struct AndroidConfig {
    priority: &'static str,
    notification: AndroidNotification,
}

#[derive(Debug, Serialize)]
struct Aps<'a> {
    alert: FcmNotification<'a>,
    sound: &'static str,
    badge: u32,
}

#[derive(Debug, Serialize)]
struct ApnsPayload<'a> {
    aps: Aps<'a>,
}

#[derive(Debug, Serialize)]
struct ApnsConfig<'a> {
    payload: ApnsPayload<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: FcmData<'a>,
    android: AndroidConfig,
    apns: ApnsConfig<'a>,
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

impl<'a> FcmRequest<'a> {
    fn new(token: &'a str, message: &'a PushMessage) -> Self {
        Self {
            message: FcmMessage {
                token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
                data: FcmData {
                    order_id: &message.order_id,
                },
                android: AndroidConfig {
                    priority: "high",
                    notification: AndroidNotification { sound: "default" },
                },
                apns: ApnsConfig {
                    payload: ApnsPayload {
                        aps: Aps {
                            alert: FcmNotification {
                                title: &message.title,
                                body: &message.body,
                            },
                            sound: "default",
                            badge: 1,
                        },
                    },
                },
            },
        }
    }
}

/// Sends push notifications with the Firebase Cloud Messaging HTTP v1 API,
/// one message per device token
pub struct FcmPushGateway {
    client: Client,
    auth: AccessTokenProvider,
    send_url: String,
}

impl FcmPushGateway {
    pub fn new(account: ServiceAccount) -> anyhow::Result<Self> {
        let client = Client::new();
        let send_url = format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            account.project_id
        );
        let auth = AccessTokenProvider::new(client.clone(), account)?;
        Ok(Self {
            client,
            auth,
            send_url,
        })
    }

    async fn send_to_device(
        &self,
        access_token: &str,
        token: &str,
        message: &PushMessage,
    ) -> anyhow::Result<()> {
        let res = self
            .client
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&FcmRequest::new(token, message))
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] FCM send error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;

        res.error_for_status().map_err(|e| {
            error!(
                "[Unexpected Response] FCM send error for project: {}. Error message: {:?}",
                self.auth.project_id(),
                e
            );
            anyhow::Error::new(e)
        })?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IPushGateway for FcmPushGateway {
    async fn send(&self, tokens: &[String], message: &PushMessage) -> anyhow::Result<()> {
        let access_token = self
            .auth
            .get_access_token(Utc::now().timestamp_millis())
            .await?;

        let results = join_all(
            tokens
                .iter()
                .map(|token| self.send_to_device(&access_token, token, message)),
        )
        .await;

        let failed = results.iter().filter(|res| res.is_err()).count();
        if failed > 0 && failed == results.len() {
            return Err(anyhow::anyhow!(
                "FCM rejected the notification for all {} devices",
                failed
            ));
        }
        Ok(())
    }
}
