use sqlx::{Error, Executor};

use crate::{
    model::{PricingChanges, PricingSettings, Table},
    types::default_pricing,
};

use super::{DataBase, QueryResult};

impl Table<PricingSettings> {
    /// Creates the default schedule for `user_id` unless a table exists.
    pub async fn insert_default<'c, E>(
        &self,
        user_id: i64,
        executor: E,
    ) -> Result<QueryResult, Error>
    where
        E: Executor<'c, Database = DataBase>,
    {
        let [day_1, day_2, day_3, day_4, day_5, day_6, day_7, extra_day] =
            default_pricing();

        sqlx::query(
            r#"
            INSERT INTO pricing_settings (
                user_id, day_1, day_2, day_3, day_4, day_5, day_6, day_7, extra_day
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(day_1)
        .bind(day_2)
        .bind(day_3)
        .bind(day_4)
        .bind(day_5)
        .bind(day_6)
        .bind(day_7)
        .bind(extra_day)
        .execute(executor)
        .await
    }

    pub async fn get_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<PricingSettings>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM pricing_settings WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_or_create(
        &self,
        user_id: i64,
    ) -> Result<PricingSettings, Error> {
        if let Some(settings) = self.get_by_user(user_id).await? {
            return Ok(settings);
        }

        self.insert_default(user_id, &self.pool).await?;

        sqlx::query_as(
            r#"
            SELECT * FROM pricing_settings WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        user_id: i64,
        changes: &PricingChanges,
    ) -> Result<PricingSettings, Error> {
        sqlx::query_as(
            r#"
            UPDATE pricing_settings SET
                day_1 = COALESCE($2, day_1),
                day_2 = COALESCE($3, day_2),
                day_3 = COALESCE($4, day_3),
                day_4 = COALESCE($5, day_4),
                day_5 = COALESCE($6, day_5),
                day_6 = COALESCE($7, day_6),
                day_7 = COALESCE($8, day_7),
                extra_day = COALESCE($9, extra_day)
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&changes.day_1)
        .bind(&changes.day_2)
        .bind(&changes.day_3)
        .bind(&changes.day_4)
        .bind(&changes.day_5)
        .bind(&changes.day_6)
        .bind(&changes.day_7)
        .bind(&changes.extra_day)
        .fetch_one(&self.pool)
        .await
    }
}
