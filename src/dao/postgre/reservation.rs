use sqlx::{Error, Transaction};

use crate::model::{NewReservation, Reservation, ReservationChanges, Table};

use super::DataBase;

impl Table<Reservation> {
    pub async fn insert(
        &self,
        owner_id: i64,
        reservation: &NewReservation,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Reservation, Error> {
        sqlx::query_as(
            r#"
            INSERT INTO reservation (
                owner_id,
                license_plate,
                customer_name,
                phone_number,
                return_date,
                flight_number,
                passenger_count,
                price,
                is_completed,
                is_paid
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&reservation.license_plate)
        .bind(&reservation.customer_name)
        .bind(&reservation.phone_number)
        .bind(reservation.return_date)
        .bind(&reservation.flight_number)
        .bind(reservation.passenger_count)
        .bind(&reservation.price)
        .bind(reservation.is_completed)
        .bind(reservation.is_paid)
        .fetch_one(&mut **transaction)
        .await
    }

    pub async fn get_by_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<Reservation>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM reservation
            WHERE owner_id = $1
            ORDER BY return_date, id
            "#,
        )
        .bind(owner_id)
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_one(
        &self,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Reservation>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM reservation WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    /// Applies `changes` to the owner's reservation. Returns `None` when the
    /// row does not exist for this owner.
    pub async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: &ReservationChanges,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Option<Reservation>, Error> {
        sqlx::query_as(
            r#"
            UPDATE reservation SET
                license_plate = COALESCE($3, license_plate),
                customer_name = COALESCE($4, customer_name),
                phone_number = CASE WHEN $5 THEN $6 ELSE phone_number END,
                return_date = COALESCE($7, return_date),
                flight_number = CASE WHEN $8 THEN $9 ELSE flight_number END,
                passenger_count = COALESCE($10, passenger_count),
                price = CASE WHEN $11 THEN $12 ELSE price END,
                is_completed = COALESCE($13, is_completed),
                is_paid = COALESCE($14, is_paid)
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&changes.license_plate)
        .bind(&changes.customer_name)
        .bind(changes.phone_number.is_some())
        .bind(changes.phone_number.clone().flatten())
        .bind(changes.return_date)
        .bind(changes.flight_number.is_some())
        .bind(changes.flight_number.clone().flatten())
        .bind(changes.passenger_count)
        .bind(changes.price.is_some())
        .bind(changes.price.clone().flatten())
        .bind(changes.is_completed)
        .bind(changes.is_paid)
        .fetch_optional(&mut **transaction)
        .await
    }

    pub async fn delete(
        &self,
        id: i64,
        owner_id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM reservation WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn toggle_completed(
        &self,
        id: i64,
        owner_id: i64,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<Option<Reservation>, Error> {
        sqlx::query_as(
            r#"
            UPDATE reservation SET is_completed = NOT is_completed
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut **transaction)
        .await
    }

    pub async fn toggle_paid(
        &self,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Reservation>, Error> {
        sqlx::query_as(
            r#"
            UPDATE reservation SET is_paid = NOT is_paid
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count_active(&self, owner_id: i64) -> Result<i64, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM reservation
            WHERE owner_id = $1 AND is_completed = false
            "#,
        )
        .bind(owner_id)
        .persistent(true)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }
}
