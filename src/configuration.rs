use std::{
    env, fs,
    ops::Deref,
    str::FromStr,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use jsonwebtoken::jwk::JwkSet;

use crate::{
    error::Error,
    provider::{DatabasePool, HTTP},
};

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 5] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8000",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

/// Provider signing keys together with the moment they were fetched.
#[derive(Debug, Default)]
pub struct Cache {
    pub google_keys: Option<(JwkSet, DateTime<Utc>)>,
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub http: HTTP,
    pub cache: Mutex<Cache>,
}

impl State {
    pub fn new(config: Config, database: DatabasePool, http: HTTP) -> State {
        Self {
            config,
            database,
            http,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Returns the provider JWKS, refetching it once the cached copy is
    /// older than `google_certs_ttl` seconds.
    pub async fn google_keys(&self) -> Result<JwkSet, Error> {
        let now = Utc::now();

        if let Ok(cache) = self.cache.lock() {
            if let Some((keys, fetched_at)) = &cache.google_keys {
                let age = (now - *fetched_at).num_seconds();
                if age >= 0 && (age as u64) < self.config.google_certs_ttl {
                    return Ok(keys.clone());
                }
            }
        }

        let keys = self.http.get_google_certs().await?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.google_keys = Some((keys.clone(), now));
        }

        Ok(keys)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub jwt_secret: String,
    pub access_token_lifetime: i64,
    pub refresh_token_lifetime: i64,
    pub google_client_id: String,
    pub google_certs_url: String,
    pub google_certs_ttl: u64,
    pub timeout: u64,
    pub mail_to: String,
    pub vapid_private_key: Vec<u8>,
    pub vapid_public_key: Vec<u8>,
    pub push_ttl: i64,
}

fn parse_config_vapid_keys() -> Result<(Vec<u8>, Vec<u8>), Error> {
    let private_key_path = env_or("VAPID_PRIVATE_KEY_PATH", "cert/vapid_private.pem");
    let public_key_path = env_or("VAPID_PUBLIC_KEY_PATH", "cert/vapid_public.b64");

    let private_key = fs::read(&private_key_path).with_context(|| {
        format!("reading VAPID private key {}", private_key_path)
    })?;
    let public_key = fs::read(&public_key_path).with_context(|| {
        format!("reading VAPID public key {}", public_key_path)
    })?;

    Ok((private_key, public_key))
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 20)?;
    let server_host = env_or("SERVER_HOST", "127.0.0.1");
    let port: u16 = parse_or("PORT", 8000)?;

    let allowed_origins = match env::var("ALLOWED_ORIGINS") {
        Ok(value) => parse_list(&value),
        Err(_) => DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|item| item.to_string())
            .collect(),
    };

    let jwt_secret = env::var("JWT_SECRET")?;
    if jwt_secret.len() < 32 {
        return Err(Error::ConfigurationError(String::from(
            "JWT_SECRET must be at least 32 characters",
        )));
    }

    let access_token_lifetime = parse_or("ACCESS_TOKEN_LIFETIME", 24 * 60 * 60)?;
    let refresh_token_lifetime =
        parse_or("REFRESH_TOKEN_LIFETIME", 7 * 24 * 60 * 60)?;

    let google_client_id = env::var("GOOGLE_CLIENT_ID")?;
    let google_certs_url = env_or("GOOGLE_CERTS_URL", GOOGLE_CERTS_URL);
    let google_certs_ttl = parse_or("GOOGLE_CERTS_TTL", 60 * 60)?;

    let timeout = parse_or("TIMEOUT", 30)?;
    let mail_to = env::var("MAIL_TO")?;
    let (vapid_private_key, vapid_public_key) = parse_config_vapid_keys()?;
    let push_ttl = parse_or("PUSH_TTL", 24 * 60 * 60)?;

    let config = Config {
        database_url,
        max_connections,
        server_host,
        port,
        allowed_origins,
        jwt_secret,
        access_token_lifetime,
        refresh_token_lifetime,
        google_client_id,
        google_certs_url,
        google_certs_ttl,
        timeout,
        mail_to,
        vapid_private_key,
        vapid_public_key,
        push_ttl,
    };

    Ok(config)
}

/// Loads `.env` from the working directory into the process environment.
/// Variables already present in the environment win.
pub fn set_configuration() -> Result<(), Error> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded configuration from {}", path.display());
            Ok(())
        },
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::ConfigurationError(e.to_string())),
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_or<T>(key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value.trim().parse::<T>().map_err(|e| {
            Error::ConfigurationError(format!("{}: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}

pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_owned())
        .collect()
}
