use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims of the tokens this service issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
}

/// Claims read from a provider ID token. Only `email` is mandatory for
/// login; the rest is validated separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleClaims {
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub exp: Option<f64>,
    pub aud: Option<serde_json::Value>,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

impl GoogleLoginRequest {
    pub fn token(&self) -> Option<&str> {
        self.id_token
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| self.access_token.as_deref().filter(|value| !value.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn login(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.email.as_deref().filter(|value| !value.trim().is_empty()))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(alias = "refresh")]
    pub refresh_token: String,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}
