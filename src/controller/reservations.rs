//! Reservation endpoints
//!
//! Every route is scoped to the authenticated caller; a reservation owned
//! by someone else answers exactly like a missing one.

use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};

use crate::{
    auth::AuthUser,
    configuration::{AppState, State},
    error::Error,
    handler::reservation,
    types::{FlightStatus, ReservationRequest, ReservationResponse},
};

#[get("/reservations")]
pub async fn list(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
) -> Result<impl Responder, Error> {
    let items: Vec<ReservationResponse> = reservation::list(&state, auth.id)
        .await?
        .into_iter()
        .map(ReservationResponse::from)
        .collect();

    Ok(web::Json(items))
}

#[post("/reservations")]
pub async fn create(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    data: web::Json<ReservationRequest>,
) -> Result<HttpResponse, Error> {
    let new = data.into_inner().into_new()?;
    let item = reservation::create(&state, auth.id, new).await?;

    Ok(HttpResponse::Created().json(ReservationResponse::from(item)))
}

#[get("/reservations/{id}")]
pub async fn retrieve(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, Error> {
    let item = reservation::get(&state, auth.id, path.into_inner()).await?;

    Ok(web::Json(ReservationResponse::from(item)))
}

#[put("/reservations/{id}")]
pub async fn replace(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    path: web::Path<i64>,
    data: web::Json<ReservationRequest>,
) -> Result<impl Responder, Error> {
    let changes = data.into_inner().into_changes(false)?;
    let item =
        reservation::update(&state, auth.id, path.into_inner(), changes).await?;

    Ok(web::Json(ReservationResponse::from(item)))
}

#[patch("/reservations/{id}")]
pub async fn update(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    path: web::Path<i64>,
    data: web::Json<ReservationRequest>,
) -> Result<impl Responder, Error> {
    let changes = data.into_inner().into_changes(true)?;
    let item =
        reservation::update(&state, auth.id, path.into_inner(), changes).await?;

    Ok(web::Json(ReservationResponse::from(item)))
}

#[delete("/reservations/{id}")]
pub async fn destroy(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    reservation::delete(&state, auth.id, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

// =============================================================================
// Actions
// =============================================================================

#[post("/reservations/{id}/toggle_complete")]
pub async fn toggle_complete(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, Error> {
    let item =
        reservation::toggle_complete(&state, auth.id, path.into_inner()).await?;

    Ok(web::Json(ReservationResponse::from(item)))
}

#[post("/reservations/{id}/toggle_payment")]
pub async fn toggle_payment(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, Error> {
    let item =
        reservation::toggle_payment(&state, auth.id, path.into_inner()).await?;

    Ok(web::Json(ReservationResponse::from(item)))
}

#[get("/reservations/{id}/flight_status")]
pub async fn flight_status(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, Error> {
    let item = reservation::get(&state, auth.id, path.into_inner()).await?;

    Ok(web::Json(FlightStatus::for_reservation(&item)?))
}
