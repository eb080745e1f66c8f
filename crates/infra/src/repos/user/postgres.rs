use super::IUserRepo;
use order_reminders_domain::User;
use sqlx::PgPool;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_uid, device_token)
            VALUES($1, $2)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.device_token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_device_tokens(&self) -> anyhow::Result<Vec<String>> {
        let tokens = sqlx::query_scalar::<_, String>(
            r#"
            SELECT u.device_token FROM users AS u
            WHERE u.device_token IS NOT NULL AND u.device_token <> ''
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tokens)
    }
}
