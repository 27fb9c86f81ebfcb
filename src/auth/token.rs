use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};

use crate::{
    configuration::Config,
    error::Error,
    model::User,
    types::{TokenClaims, TokenPairResponse, TokenType, UserResponse},
};

pub fn issue_token(
    config: &Config,
    user_id: i64,
    token_type: TokenType,
) -> Result<String, Error> {
    let iat = Utc::now().timestamp();
    let lifetime = match token_type {
        TokenType::Access => config.access_token_lifetime,
        TokenType::Refresh => config.refresh_token_lifetime,
    };

    let claims = TokenClaims {
        sub: user_id.to_string(),
        token_type,
        exp: iat + lifetime,
        iat,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn issue_token_pair(
    config: &Config,
    user: &User,
) -> Result<TokenPairResponse, Error> {
    Ok(TokenPairResponse {
        access_token: issue_token(config, user.id, TokenType::Access)?,
        refresh_token: issue_token(config, user.id, TokenType::Refresh)?,
        user: UserResponse::from(user),
    })
}

/// Returns the user id carried by a token of the `expected` type.
pub fn validate_token(
    config: &Config,
    token: &str,
    expected: TokenType,
) -> Result<i64, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            Error::Unauthorized(String::from("Token is expired"))
        },
        _ => Error::Unauthorized(String::from("Token is invalid")),
    })?;

    if data.claims.token_type != expected {
        return Err(Error::Unauthorized(format!(
            "Token has wrong type, expected {}",
            expected
        )));
    }

    data.claims
        .sub
        .parse::<i64>()
        .map_err(|_| Error::Unauthorized(String::from("Token is invalid")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: String::from("postgres://localhost/parksystem"),
            max_connections: 1,
            server_host: String::from("127.0.0.1"),
            port: 8000,
            allowed_origins: vec![String::from("http://localhost:5173")],
            jwt_secret: String::from("0123456789abcdef0123456789abcdef"),
            access_token_lifetime: 60,
            refresh_token_lifetime: 120,
            google_client_id: String::from("client.apps.googleusercontent.com"),
            google_certs_url: String::from("http://127.0.0.1:9/certs"),
            google_certs_ttl: 3600,
            timeout: 1,
            mail_to: String::from("ops@example.com"),
            vapid_private_key: Vec::new(),
            vapid_public_key: Vec::new(),
            push_ttl: 60,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = config();
        let token = issue_token(&config, 42, TokenType::Access).unwrap();
        assert_eq!(validate_token(&config, &token, TokenType::Access).unwrap(), 42);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let config = config();
        let refresh = issue_token(&config, 42, TokenType::Refresh).unwrap();
        let access = issue_token(&config, 42, TokenType::Access).unwrap();

        assert!(matches!(
            validate_token(&config, &refresh, TokenType::Access),
            Err(Error::Unauthorized(_))
        ));
        assert!(validate_token(&config, &access, TokenType::Refresh).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = config();
        config.access_token_lifetime = -10;
        let token = issue_token(&config, 1, TokenType::Access).unwrap();

        match validate_token(&config, &token, TokenType::Access) {
            Err(Error::Unauthorized(message)) => assert_eq!(message, "Token is expired"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let config = config();
        let token = issue_token(&config, 1, TokenType::Access).unwrap();

        let mut other = config.clone();
        other.jwt_secret = String::from("ffffffffffffffffffffffffffffffff");
        assert!(validate_token(&other, &token, TokenType::Access).is_err());
    }
}
