//! Reservation writes
//!
//! Every write that can change the number of active reservations
//! recomputes the owner's usage counter in the same transaction.

use crate::{
    configuration::State,
    error::Error,
    model::{NewReservation, Reservation, ReservationChanges},
};

pub const NOT_FOUND: &str = "Nie znaleziono.";

fn not_found() -> Error {
    Error::NotFound(String::from(NOT_FOUND))
}

pub async fn get(state: &State, owner_id: i64, id: i64) -> Result<Reservation, Error> {
    state
        .database
        .reservation
        .get_one(id, owner_id)
        .await?
        .ok_or_else(not_found)
}

pub async fn list(state: &State, owner_id: i64) -> Result<Vec<Reservation>, Error> {
    Ok(state.database.reservation.get_by_owner(owner_id).await?)
}

pub async fn create(
    state: &State,
    owner_id: i64,
    reservation: NewReservation,
) -> Result<Reservation, Error> {
    let mut tx = state.database.pool.begin().await?;

    let reservation = state
        .database
        .reservation
        .insert(owner_id, &reservation, &mut tx)
        .await?;
    let usage = state
        .database
        .user_profile
        .recompute_usage(owner_id, &mut tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Reservation {} created by user {}, usage {}",
        reservation.id,
        owner_id,
        usage
    );

    Ok(reservation)
}

pub async fn update(
    state: &State,
    owner_id: i64,
    id: i64,
    changes: ReservationChanges,
) -> Result<Reservation, Error> {
    let mut tx = state.database.pool.begin().await?;

    let reservation = state
        .database
        .reservation
        .update(id, owner_id, &changes, &mut tx)
        .await?
        .ok_or_else(not_found)?;

    if changes.is_completed.is_some() {
        state
            .database
            .user_profile
            .recompute_usage(owner_id, &mut tx)
            .await?;
    }

    tx.commit().await?;

    Ok(reservation)
}

pub async fn delete(state: &State, owner_id: i64, id: i64) -> Result<(), Error> {
    let mut tx = state.database.pool.begin().await?;

    let deleted = state
        .database
        .reservation
        .delete(id, owner_id, &mut tx)
        .await?;

    if !deleted {
        return Err(not_found());
    }

    let usage = state
        .database
        .user_profile
        .recompute_usage(owner_id, &mut tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Reservation {} deleted by user {}, usage {}",
        id,
        owner_id,
        usage
    );

    Ok(())
}

pub async fn toggle_complete(
    state: &State,
    owner_id: i64,
    id: i64,
) -> Result<Reservation, Error> {
    let mut tx = state.database.pool.begin().await?;

    let reservation = state
        .database
        .reservation
        .toggle_completed(id, owner_id, &mut tx)
        .await?
        .ok_or_else(not_found)?;
    state
        .database
        .user_profile
        .recompute_usage(owner_id, &mut tx)
        .await?;

    tx.commit().await?;

    Ok(reservation)
}

pub async fn toggle_payment(
    state: &State,
    owner_id: i64,
    id: i64,
) -> Result<Reservation, Error> {
    state
        .database
        .reservation
        .toggle_paid(id, owner_id)
        .await?
        .ok_or_else(not_found)
}
