use actix_web::{get, routes, web, Responder};
use chrono::Utc;

use crate::{
    auth::AuthUser,
    configuration::{AppState, State},
    error::Error,
    types::{
        days_until, money, quote as quote_price, PricingRequest, PricingResponse,
        QuoteQuery, QuoteResponse,
    },
};

#[get("/pricing-settings")]
pub async fn index(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
) -> Result<impl Responder, Error> {
    let settings = state.database.pricing_settings.get_or_create(auth.id).await?;

    Ok(web::Json(PricingResponse::from(&settings)))
}

#[routes]
#[put("/pricing-settings")]
#[patch("/pricing-settings")]
pub async fn update(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    data: web::Json<PricingRequest>,
) -> Result<impl Responder, Error> {
    let changes = data.validate()?;

    let pricing = &state.database.pricing_settings;
    pricing.get_or_create(auth.id).await?;
    let settings = pricing.update(auth.id, &changes).await?;

    Ok(web::Json(PricingResponse::from(&settings)))
}

#[get("/pricing-settings/quote")]
pub async fn quote(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    query: web::Query<QuoteQuery>,
) -> Result<impl Responder, Error> {
    let settings = state.database.pricing_settings.get_or_create(auth.id).await?;
    let days = days_until(Utc::now(), query.return_date);

    Ok(web::Json(QuoteResponse {
        days,
        price: money(&quote_price(&settings, days)),
    }))
}
