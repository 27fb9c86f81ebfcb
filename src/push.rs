//! Web Push delivery
//!
//! Encrypts a payload for one subscription (aes128gcm) and posts it to
//! the subscription endpoint with a VAPID ES256 signature.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;

use crate::{
    configuration::{Config, State},
    error::Error,
    model::PushSubscription,
    types::{PushData, PushHeader, VapidClaims},
};

/// Audience of the VAPID token: the origin of the push service.
pub fn audience(endpoint: &str) -> Result<String, Error> {
    let url = Url::parse(endpoint)?;
    let host = url.host_str().ok_or_else(|| {
        Error::BadRequest(format!("Push endpoint without host: {}", endpoint))
    })?;

    let aud = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };

    Ok(aud)
}

fn decode_key(value: &str) -> Result<Vec<u8>, Error> {
    Ok(BASE64_URL.decode(value.trim().trim_end_matches('='))?)
}

/// Signed VAPID token for `endpoint`, valid for `ttl` seconds from `now`.
pub fn vapid_token(
    config: &Config,
    endpoint: &str,
    ttl: i64,
    now: i64,
) -> Result<String, Error> {
    // VAPID tokens must expire within 24 hours.
    let claims = VapidClaims {
        aud: audience(endpoint)?,
        sub: format!("mailto:{}", &config.mail_to),
        exp: now + ttl.clamp(60, 12 * 60 * 60),
    };

    let key = EncodingKey::from_ec_pem(&config.vapid_private_key)?;
    Ok(encode(&Header::new(Algorithm::ES256), &claims, &key)?)
}

pub async fn send_push(
    state: &State,
    subscription: &PushSubscription,
    push_header: &PushHeader,
    push_data: &PushData,
) -> Result<(), Error> {
    let token = vapid_token(
        &state.config,
        &subscription.endpoint,
        push_header.ttl,
        Utc::now().timestamp(),
    )?;

    let p256dh = decode_key(&subscription.p256dh)?;
    let auth = decode_key(&subscription.auth)?;
    let data = ece::encrypt(&p256dh, &auth, push_data.to_string().as_bytes())?;

    let status = state
        .http
        .post_push(&subscription.endpoint, token, push_header, data)
        .await?;

    if !(200..300).contains(&status) {
        return Err(Error::PushGateway(status));
    }

    Ok(())
}
