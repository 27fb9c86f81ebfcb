//! Google ID token checks
//!
//! Payload claims are checked first, then the RS256 signature against
//! the provider JWKS.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use crate::{configuration::State, error::Error, types::GoogleClaims};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

pub const MISSING_TOKEN: &str = "Brak tokena";
pub const INVALID_FORMAT: &str = "Nieprawidłowy format tokena";
pub const DECODE_FAILED: &str = "Błąd dekodowania tokena";
pub const MISSING_EMAIL: &str = "Brak emaila w tokenie";
pub const EXPIRED: &str = "Token wygasł";
pub const INVALID_AUDIENCE: &str = "Nieprawidłowy audience";
pub const INVALID_SIGNATURE: &str = "Nieprawidłowy podpis tokena";

#[derive(Debug, Clone, PartialEq)]
pub struct GoogleIdentity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

fn audience_matches(aud: Option<&serde_json::Value>, client_id: &str) -> bool {
    match aud {
        Some(serde_json::Value::String(value)) => value == client_id,
        Some(serde_json::Value::Array(values)) => {
            values.iter().any(|value| value.as_str() == Some(client_id))
        },
        _ => false,
    }
}

/// Reads the unverified payload and applies the claim checks in order:
/// format, email, expiry, audience.
pub fn inspect_claims(
    token: &str,
    client_id: &str,
    now: i64,
) -> Result<GoogleIdentity, Error> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(Error::InvalidToken(String::from(INVALID_FORMAT)));
    }

    let payload = BASE64_URL
        .decode(parts[1].trim_end_matches('='))
        .map_err(|_| Error::InvalidToken(String::from(DECODE_FAILED)))?;
    let claims: GoogleClaims = serde_json::from_slice(&payload)
        .map_err(|_| Error::InvalidToken(String::from(DECODE_FAILED)))?;

    let email = match claims.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_owned(),
        _ => return Err(Error::InvalidToken(String::from(MISSING_EMAIL))),
    };

    if claims.exp.unwrap_or(0.0) < now as f64 {
        return Err(Error::InvalidToken(String::from(EXPIRED)));
    }

    if !audience_matches(claims.aud.as_ref(), client_id) {
        return Err(Error::InvalidToken(String::from(INVALID_AUDIENCE)));
    }

    Ok(GoogleIdentity {
        email,
        first_name: claims.given_name.unwrap_or_default(),
        last_name: claims.family_name.unwrap_or_default(),
    })
}

async fn verify_signature(state: &State, token: &str) -> Result<(), Error> {
    let header = decode_header(token)
        .map_err(|_| Error::InvalidToken(String::from(INVALID_FORMAT)))?;
    let kid = header
        .kid
        .ok_or_else(|| Error::InvalidToken(String::from(INVALID_SIGNATURE)))?;

    let keys = state.google_keys().await?;
    let jwk = keys
        .find(&kid)
        .ok_or_else(|| Error::InvalidToken(String::from(INVALID_SIGNATURE)))?;
    let key = DecodingKey::from_jwk(jwk)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[&state.config.google_client_id]);
    validation.set_issuer(&GOOGLE_ISSUERS);

    decode::<GoogleClaims>(token, &key, &validation).map_err(|e| {
        tracing::warn!("Provider token rejected: {}", e);
        Error::InvalidToken(String::from(INVALID_SIGNATURE))
    })?;

    Ok(())
}

pub async fn verify_google_token(
    state: &State,
    token: Option<&str>,
) -> Result<GoogleIdentity, Error> {
    let token = token.ok_or_else(|| Error::InvalidToken(String::from(MISSING_TOKEN)))?;
    let identity =
        inspect_claims(token, &state.config.google_client_id, Utc::now().timestamp())?;

    verify_signature(state, token).await?;

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const CLIENT_ID: &str = "client.apps.googleusercontent.com";

    fn unsigned_token(payload: serde_json::Value) -> String {
        let header = BASE64_URL.encode(br#"{"alg":"RS256","kid":"k1","typ":"JWT"}"#);
        let payload = BASE64_URL.encode(payload.to_string());
        format!("{}.{}.c2lnbmF0dXJl", header, payload)
    }

    fn message(result: Result<GoogleIdentity, Error>) -> String {
        match result {
            Err(Error::InvalidToken(message)) => message,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert_eq!(message(inspect_claims("abc.def", CLIENT_ID, 0)), INVALID_FORMAT);
        assert_eq!(message(inspect_claims("a.!!!.c", CLIENT_ID, 0)), DECODE_FAILED);
    }

    #[test]
    fn test_checks_run_in_order() {
        let now = 1_700_000_000;

        let token = unsigned_token(json!({"exp": 1, "aud": "other"}));
        assert_eq!(message(inspect_claims(&token, CLIENT_ID, now)), MISSING_EMAIL);

        let token = unsigned_token(json!({"email": "a@b.pl", "exp": now - 1, "aud": "other"}));
        assert_eq!(message(inspect_claims(&token, CLIENT_ID, now)), EXPIRED);

        let token = unsigned_token(json!({"email": "a@b.pl", "aud": CLIENT_ID}));
        assert_eq!(message(inspect_claims(&token, CLIENT_ID, now)), EXPIRED);

        let token = unsigned_token(json!({"email": "a@b.pl", "exp": now + 60, "aud": "other"}));
        assert_eq!(message(inspect_claims(&token, CLIENT_ID, now)), INVALID_AUDIENCE);
    }

    #[test]
    fn test_accepts_valid_claims() {
        let now = 1_700_000_000;
        let token = unsigned_token(json!({
            "email": "jan@example.com",
            "given_name": "Jan",
            "exp": now + 600,
            "aud": CLIENT_ID,
        }));

        let identity = inspect_claims(&token, CLIENT_ID, now).unwrap();
        assert_eq!(identity.email, "jan@example.com");
        assert_eq!(identity.first_name, "Jan");
        assert_eq!(identity.last_name, "");
    }
}
