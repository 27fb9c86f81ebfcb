use sqlx::{Error, Transaction};

use crate::model::{Table, UserProfile};

use super::{DataBase, QueryResult};

impl Table<UserProfile> {
    pub async fn insert_default(
        &self,
        user_id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO user_profile (user_id)
            VALUES($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut **transaction)
        .await
    }

    pub async fn get_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<UserProfile>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM user_profile WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    /// Upserts the profile with `plan` and `plan_code` both set to `code`.
    /// A freshly created profile starts with the current usage count.
    pub async fn set_plan(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<UserProfile, Error> {
        sqlx::query_as(
            r#"
            INSERT INTO user_profile (user_id, plan, plan_code, usage)
            VALUES(
                $1,
                $2,
                $2,
                (
                    SELECT COUNT(*)::INTEGER FROM reservation
                    WHERE owner_id = $1 AND is_completed = false
                )
            )
            ON CONFLICT (user_id) DO UPDATE SET
                plan = EXCLUDED.plan,
                plan_code = EXCLUDED.plan_code
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(code)
        .fetch_one(&self.pool)
        .await
    }

    /// Recounts the owner's non-completed reservations into `usage`,
    /// creating the profile when it is missing.
    pub async fn recompute_usage(
        &self,
        user_id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<i32, Error> {
        let (usage,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO user_profile (user_id, usage)
            VALUES(
                $1,
                (
                    SELECT COUNT(*)::INTEGER FROM reservation
                    WHERE owner_id = $1 AND is_completed = false
                )
            )
            ON CONFLICT (user_id) DO UPDATE SET usage = EXCLUDED.usage
            RETURNING usage
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut **transaction)
        .await?;

        Ok(usage)
    }
}
