use actix_web::{get, post, web, Responder};

use crate::{
    auth::AuthUser,
    configuration::{AppState, State},
    error::Error,
    handler::account,
    types::{Plan, ProfileResponse, SetPlanRequest},
};

#[get("/profile")]
pub async fn index(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
) -> Result<impl Responder, Error> {
    let (user, profile) = tokio::try_join!(
        account::current_user(&state, auth.id),
        async {
            state
                .database
                .user_profile
                .get_by_user(auth.id)
                .await
                .map_err(Error::from)
        }
    )?;

    let profile = profile
        .ok_or_else(|| Error::NotFound(String::from("Profil nie istnieje")))?;

    Ok(web::Json(ProfileResponse::new(&profile, &user)))
}

#[post("/set-plan")]
pub async fn set_plan(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
    data: web::Json<SetPlanRequest>,
) -> Result<impl Responder, Error> {
    let code = match data.plan_code.as_deref() {
        Some(code) if !code.is_empty() => code,
        _ => return Err(Error::BadRequest(String::from("Brak kodu planu"))),
    };

    let plan: Plan = code
        .parse()
        .map_err(|_| Error::BadRequest(String::from("Nieprawidłowy kod planu")))?;

    let profile = state
        .database
        .user_profile
        .set_plan(auth.id, plan.code())
        .await?;

    let user = account::current_user(&state, auth.id).await?;

    tracing::info!("User {} switched to plan {}", auth.id, plan);

    Ok(web::Json(ProfileResponse::new(&profile, &user)))
}
