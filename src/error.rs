use std::{collections::BTreeMap, env::VarError, io::Error as IO_ERROR};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use anyhow::Error as ANYHOW_ERROR;
use base64::DecodeError as BASE64_DECODE_ERROR;
use bcrypt::BcryptError as BCRYPT_ERROR;
use ece::Error as ECE_ERROR;
use jsonwebtoken::errors::Error as JWT_ERROR;
use reqwest::header::{
    InvalidHeaderName as INVALID_HEADER_NAME,
    InvalidHeaderValue as INVALID_HEADER_VALUE,
};
use reqwest::Error as REQWEST_ERROR;
use sqlx::{error::Error as SQL_ERROR, migrate::MigrateError as MIGRATE_ERROR};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

/// Field name to the list of problems found with it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    Migrate(#[from] MIGRATE_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    Base64DecodeError(#[from] BASE64_DECODE_ERROR),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("{0}")]
    InvalidHeaderName(#[from] INVALID_HEADER_NAME),

    #[error("{0}")]
    InvalidHeaderValue(#[from] INVALID_HEADER_VALUE),

    #[error("{0}")]
    EceError(#[from] ECE_ERROR),

    #[error("{0}")]
    JWT(#[from] JWT_ERROR),

    #[error("{0}")]
    Bcrypt(#[from] BCRYPT_ERROR),

    #[error("{0}")]
    AnyHowError(#[from] ANYHOW_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid fields: {}", field_names(.0))]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Push gateway responded with status {0}")]
    PushGateway(u16),
}

fn field_names(errors: &FieldErrors) -> String {
    errors.keys().cloned().collect::<Vec<String>>().join(", ")
}

impl Error {
    pub fn field(name: &str, message: &str) -> Error {
        let mut errors = FieldErrors::new();
        errors.insert(name.to_owned(), vec![message.to_owned()]);
        Error::Validation(errors)
    }

    /// True when the database rejected a write because of a unique index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::SQL(SQL_ERROR::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::BadRequest(_)
            | Error::InvalidToken(_)
            | Error::InvalidCredentials
            | Error::Conflict(_) => StatusCode::BAD_REQUEST,

            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            Error::NotFound(_) => StatusCode::NOT_FOUND,

            Error::PushGateway(_) | Error::ReqwestError(_) => {
                StatusCode::BAD_GATEWAY
            },

            Error::Io(_)
            | Error::URL(_)
            | Error::SQL(_)
            | Error::Migrate(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::Base64DecodeError(_)
            | Error::InvalidHeaderName(_)
            | Error::InvalidHeaderValue(_)
            | Error::EceError(_)
            | Error::JWT(_)
            | Error::Bcrypt(_)
            | Error::AnyHowError(_)
            | Error::SetGlobalDefaultError(_)
            | Error::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{} {}", status.as_u16(), self);
            let body = serde_json::json!({
                "error": status.canonical_reason().unwrap_or("Server error"),
                "status": status.as_u16(),
            });
            return HttpResponse::build(status).json(body);
        }

        let body = match self {
            Error::Validation(fields) => serde_json::json!({
                "error": self.to_string(),
                "fields": fields,
                "status": status.as_u16(),
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            }),
        };

        HttpResponse::build(status).json(body)
    }
}
