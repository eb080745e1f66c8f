use super::INotificationRepo;
use crate::repos::shared::repo::DeleteResult;
use chrono::{DateTime, Utc};
use order_reminders_domain::{Notification, ID};
use sqlx::{types::Uuid, FromRow, PgPool, Postgres, Transaction};
use tracing::error;

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRaw {
    notification_uid: Uuid,
    order_id: String,
    title: String,
    body: String,
    scheduled_time: DateTime<Utc>,
    state: String,
    created_at: DateTime<Utc>,
    canceled_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    version: i64,
}

impl TryFrom<NotificationRaw> for Notification {
    type Error = anyhow::Error;

    fn try_from(raw: NotificationRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.notification_uid.into(),
            order_id: raw.order_id,
            title: raw.title,
            body: raw.body,
            scheduled_time: raw.scheduled_time,
            state: raw.state.parse()?,
            created_at: raw.created_at,
            canceled_at: raw.canceled_at,
            sent_at: raw.sent_at,
            version: raw.version,
        })
    }
}

fn into_notifications(raws: Vec<NotificationRaw>) -> anyhow::Result<Vec<Notification>> {
    raws.into_iter().map(Notification::try_from).collect()
}

async fn insert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    notification: &Notification,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications
        (notification_uid, order_id, title, body, scheduled_time, state, created_at, canceled_at, sent_at, version)
        VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(notification.id.inner_ref())
    .bind(&notification.order_id)
    .bind(&notification.title)
    .bind(&notification.body)
    .bind(notification.scheduled_time)
    .bind(notification.state.as_str())
    .bind(notification.created_at)
    .bind(notification.canceled_at)
    .bind(notification.sent_at)
    .bind(notification.version)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait::async_trait]
impl INotificationRepo for PostgresNotificationRepo {
    async fn insert(&self, notification: &Notification) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        insert_in_tx(&mut tx, notification).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_for_order(
        &self,
        order_id: &str,
        canceled_at: DateTime<Utc>,
        notifications: &[Notification],
    ) -> anyhow::Result<Vec<Notification>> {
        let mut tx = self.pool.begin().await?;

        let active: Vec<NotificationRaw> = sqlx::query_as::<_, NotificationRaw>(
            r#"
            SELECT * FROM notifications AS n
            WHERE n.order_id = $1 AND n.state IN ('scheduled', 'queued')
            FOR UPDATE
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE notifications
            SET state = 'canceled', canceled_at = $2, version = version + 1
            WHERE order_id = $1 AND state IN ('scheduled', 'queued')
            "#,
        )
        .bind(order_id)
        .bind(canceled_at)
        .execute(&mut *tx)
        .await?;

        for notification in notifications {
            insert_in_tx(&mut tx, notification).await?;
        }
        tx.commit().await?;

        into_notifications(active)
    }

    async fn find(&self, notification_id: &ID) -> Option<Notification> {
        let raw: NotificationRaw = match sqlx::query_as::<_, NotificationRaw>(
            r#"
            SELECT * FROM notifications AS n
            WHERE n.notification_uid = $1
            "#,
        )
        .bind(notification_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Unable to find notification: {}. Error: {:?}", notification_id, e);
                return None;
            }
        };
        raw.try_into().ok()
    }

    async fn find_by_order(&self, order_id: &str) -> Vec<Notification> {
        let raws: Vec<NotificationRaw> = sqlx::query_as::<_, NotificationRaw>(
            r#"
            SELECT * FROM notifications AS n
            WHERE n.order_id = $1
            ORDER BY n.scheduled_time
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        into_notifications(raws).unwrap_or_default()
    }

    async fn find_due(&self, before: DateTime<Utc>) -> anyhow::Result<Vec<Notification>> {
        let raws: Vec<NotificationRaw> = sqlx::query_as::<_, NotificationRaw>(
            r#"
            SELECT * FROM notifications AS n
            WHERE n.state = 'queued' AND n.scheduled_time <= $1
            ORDER BY n.scheduled_time
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await?;
        into_notifications(raws)
    }

    async fn save(&self, notification: &Notification) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE notifications
            SET title = $2,
            body = $3,
            scheduled_time = $4,
            state = $5,
            canceled_at = $6,
            sent_at = $7,
            version = version + 1
            WHERE notification_uid = $1
            "#,
        )
        .bind(notification.id.inner_ref())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.scheduled_time)
        .bind(notification.state.as_str())
        .bind(notification.canceled_at)
        .bind(notification.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_if_current(
        &self,
        notification: &Notification,
    ) -> anyhow::Result<Option<Notification>> {
        let raw: Option<NotificationRaw> = sqlx::query_as::<_, NotificationRaw>(
            r#"
            UPDATE notifications
            SET title = $2,
            body = $3,
            scheduled_time = $4,
            state = $5,
            canceled_at = $6,
            sent_at = $7,
            version = version + 1
            WHERE notification_uid = $1 AND version = $8
            RETURNING *
            "#,
        )
        .bind(notification.id.inner_ref())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.scheduled_time)
        .bind(notification.state.as_str())
        .bind(notification.canceled_at)
        .bind(notification.sent_at)
        .bind(notification.version)
        .fetch_optional(&self.pool)
        .await?;
        raw.map(Notification::try_from).transpose()
    }

    async fn delete(&self, notification_id: &ID) -> Option<Notification> {
        let raw: NotificationRaw = match sqlx::query_as::<_, NotificationRaw>(
            r#"
            DELETE FROM notifications AS n
            WHERE n.notification_uid = $1
            RETURNING *
            "#,
        )
        .bind(notification_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Unable to delete notification: {}. Error: {:?}", notification_id, e);
                return None;
            }
        };
        raw.try_into().ok()
    }

    async fn delete_sent_before(&self, before: DateTime<Utc>) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE state = 'sent' AND sent_at < $1
            "#,
        )
        .bind(before)
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
