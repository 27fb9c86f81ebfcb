use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::TokenType,
};

use super::validate_token;

/// Caller identified by the `Authorization: Bearer <access token>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

fn bearer(req: &HttpRequest) -> Result<&str, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            Error::Unauthorized(String::from(
                "Authentication credentials were not provided.",
            ))
        })?
        .to_str()
        .map_err(|_| Error::Unauthorized(String::from("Token is invalid")))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(token.trim())
        },
        _ => Err(Error::Unauthorized(String::from(
            "Authorization header must contain a Bearer token",
        ))),
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AppState<State>>>() {
            Some(state) => bearer(req)
                .and_then(|token| {
                    validate_token(&state.config, token, TokenType::Access)
                })
                .map(|id| AuthUser { id }),
            None => Err(Error::ConfigurationError(String::from(
                "application state is not registered",
            ))),
        };

        ready(result)
    }
}
