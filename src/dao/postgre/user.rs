use sqlx::{Error, Transaction};

use crate::model::{NewUser, Table, User};

use super::DataBase;

impl Table<User> {
    pub async fn insert(
        &self,
        user: &NewUser,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<User, Error> {
        sqlx::query_as(
            r#"
            INSERT INTO users (username, email, first_name, last_name, password_hash)
            VALUES($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .fetch_one(&mut **transaction)
        .await
    }

    pub async fn get_one(&self, id: i64) -> Result<Option<User>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    /// Oldest account whose email matches case-insensitively.
    pub async fn get_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE lower(email) = lower($1)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(email)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    /// Local login accepts either the username or the email address.
    pub async fn get_by_login(
        &self,
        login: &str,
    ) -> Result<Option<User>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE username = $1 OR lower(email) = lower($1)
            ORDER BY (username = $1) DESC, id
            LIMIT 1
            "#,
        )
        .bind(login)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }
}
