//! Push notification types
//!
//! Payloads, delivery headers and the subscription body sent by the
//! browser when it registers for notifications.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Push Message Types
// =============================================================================

#[derive(Debug, Clone)]
pub struct PushHeader {
    pub ttl: i64,
    pub urgency: Urgency,
}

/// Notification as the client service worker reads it: `head` becomes
/// the title, `body` the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushData {
    pub head: String,
    pub body: String,
}

impl PushData {
    pub fn welcome() -> PushData {
        PushData {
            head: String::from("Powiadomienia włączone"),
            body: String::from(
                "Będziesz otrzymywać powiadomienia o swoich rezerwacjach.",
            ),
        }
    }

    pub fn test() -> PushData {
        PushData {
            head: String::from("Test"),
            body: String::from("To jest testowe powiadomienie! 🎉"),
        }
    }
}

impl fmt::Display for PushData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

// =============================================================================
// Urgency Enum
// =============================================================================

#[derive(Debug, Clone)]
pub enum Urgency {
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Urgency::High => write!(f, "high"),
        }
    }
}

// =============================================================================
// Subscription Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub subscription: SubscriptionData,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionData {
    pub endpoint: String,
    #[serde(alias = "expirationTime")]
    pub expiration_time: Option<i64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub endpoint: String,
    pub status: String,
}

// =============================================================================
// VAPID Claims
// =============================================================================

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct VapidClaims {
    pub aud: String,
    pub sub: String,
    pub exp: i64,
}
