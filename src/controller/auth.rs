//! Authentication endpoints
//!
//! Local accounts, Google sign-in and token refresh.

use actix_web::{get, post, routes, web, HttpResponse, Responder};

use crate::{
    auth::{issue_token, issue_token_pair, validate_token, verify_google_token, AuthUser},
    configuration::{AppState, State},
    error::Error,
    handler::account,
    types::{
        AccessTokenResponse, DetailResponse, GoogleLoginRequest, LoginRequest,
        RefreshRequest, RegisterRequest, TokenType, UserResponse,
    },
};

// =============================================================================
// Google Sign-In
// =============================================================================

#[post("/auth/google")]
pub async fn google(
    state: web::Data<AppState<State>>,
    data: web::Json<GoogleLoginRequest>,
) -> Result<impl Responder, Error> {
    let identity = verify_google_token(&state, data.token()).await?;
    let user = account::login_with_google(&state, identity).await?;

    Ok(web::Json(issue_token_pair(&state.config, &user)?))
}

// =============================================================================
// Local Accounts
// =============================================================================

#[routes]
#[post("/auth/login")]
#[post("/auth/token")]
pub async fn login(
    state: web::Data<AppState<State>>,
    data: web::Json<LoginRequest>,
) -> Result<impl Responder, Error> {
    let user = account::login(&state, data.into_inner()).await?;

    Ok(web::Json(issue_token_pair(&state.config, &user)?))
}

#[post("/auth/registration")]
pub async fn registration(
    state: web::Data<AppState<State>>,
    data: web::Json<RegisterRequest>,
) -> Result<HttpResponse, Error> {
    let user = account::register(&state, data.into_inner()).await?;

    Ok(HttpResponse::Created().json(issue_token_pair(&state.config, &user)?))
}

#[post("/auth/token/refresh")]
pub async fn refresh(
    state: web::Data<AppState<State>>,
    data: web::Json<RefreshRequest>,
) -> Result<impl Responder, Error> {
    let user_id = validate_token(&state.config, &data.refresh_token, TokenType::Refresh)?;
    let user = account::current_user(&state, user_id).await?;

    Ok(web::Json(AccessTokenResponse {
        access_token: issue_token(&state.config, user.id, TokenType::Access)?,
    }))
}

#[post("/auth/logout")]
pub async fn logout() -> Result<impl Responder, Error> {
    Ok(web::Json(DetailResponse {
        detail: "Successfully logged out.",
    }))
}

#[get("/auth/user")]
pub async fn current_user(
    state: web::Data<AppState<State>>,
    auth: AuthUser,
) -> Result<impl Responder, Error> {
    let user = account::current_user(&state, auth.id).await?;

    Ok(web::Json(UserResponse::from(&user)))
}
