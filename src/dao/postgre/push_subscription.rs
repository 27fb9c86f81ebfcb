use sqlx::{Error, Transaction};

use crate::model::{PushRecipient, PushSubscription, Table};

use super::DataBase;

impl Table<PushSubscription> {
    /// Stores the caller's endpoint. An endpoint previously registered by
    /// another user is released first, so each endpoint has one owner.
    pub async fn upsert(
        &self,
        user_id: i64,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<PushSubscription, Error> {
        sqlx::query(
            r#"
            DELETE FROM push_subscription WHERE endpoint = $1 AND user_id != $2
            "#,
        )
        .bind(endpoint)
        .bind(user_id)
        .execute(&mut **transaction)
        .await?;

        sqlx::query_as(
            r#"
            INSERT INTO push_subscription (user_id, endpoint, p256dh, auth)
            VALUES($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                endpoint = EXCLUDED.endpoint,
                p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(endpoint)
        .bind(p256dh)
        .bind(auth)
        .fetch_one(&mut **transaction)
        .await
    }

    pub async fn delete_by_user(&self, user_id: i64) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM push_subscription WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_all(&self) -> Result<Vec<PushRecipient>, Error> {
        sqlx::query_as(
            r#"
            SELECT s.*, u.username
            FROM push_subscription s
            INNER JOIN users u ON u.id = s.user_id
            ORDER BY s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
