use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;

use crate::{
    configuration::Config,
    error::{self, Error},
    types::PushHeader,
};

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let http = match Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                return Err(error::Error::ReqwestError(e));
            },
        };

        Ok(HTTP { config, http })
    }

    pub async fn get_google_certs(&self) -> Result<JwkSet, Error> {
        let keys = self
            .http
            .get(&self.config.google_certs_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        tracing::info!("Fetched {} provider signing keys", keys.keys.len());

        Ok(keys)
    }

    pub async fn post_push(
        &self,
        url: &str,
        signature: String,
        push_header: &PushHeader,
        data: Vec<u8>,
    ) -> Result<u16, Error> {
        let mut header_map = HeaderMap::new();
        let vapid = format!("vapid t={}, k={}", &signature, self.vapid_public_key()?);

        header_map.insert(
            HeaderName::from_str("User-Agent")?,
            HeaderValue::from_str("parksystem")?,
        );
        header_map.insert(
            HeaderName::from_str("authorization")?,
            HeaderValue::from_str(vapid.as_str())?,
        );
        header_map.insert(
            HeaderName::from_str("content-encoding")?,
            HeaderValue::from_str("aes128gcm")?,
        );
        header_map.insert(
            HeaderName::from_str("content-type")?,
            HeaderValue::from_str("application/octet-stream")?,
        );
        header_map.insert(
            HeaderName::from_str("ttl")?,
            HeaderValue::from_str(&push_header.ttl.to_string())?,
        );
        header_map.insert(
            HeaderName::from_str("urgency")?,
            HeaderValue::from_str(&push_header.urgency.to_string())?,
        );

        let response = self
            .http
            .post(url)
            .headers(header_map)
            .body(data)
            .send()
            .await?;
        let status = response.status().as_u16();

        Ok(status)
    }

    fn vapid_public_key(&self) -> Result<String, Error> {
        let key = String::from_utf8(self.config.vapid_public_key.clone())
            .map_err(|_| {
                Error::ConfigurationError(String::from("invalid VAPID key"))
            })?;
        Ok(key.trim().to_owned())
    }
}
