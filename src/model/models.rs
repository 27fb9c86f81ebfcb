//! Persisted entities
//!
//! One struct per table, mirroring the columns created by the
//! migrations. Wire representations live in `types`.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

// =============================================================================
// ACCOUNTS
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub plan: Option<String>,
    pub plan_code: Option<String>,
    pub usage: i32,
}

// =============================================================================
// RESERVATIONS
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub owner_id: i64,
    pub license_plate: String,
    pub customer_name: String,
    pub phone_number: Option<String>,
    pub return_date: DateTime<Utc>,
    pub flight_number: Option<String>,
    pub passenger_count: i16,
    pub price: Option<BigDecimal>,
    pub is_completed: bool,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a reservation insert. The owner is never part of
/// it; it always comes from the authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub license_plate: String,
    pub customer_name: String,
    pub phone_number: Option<String>,
    pub return_date: DateTime<Utc>,
    pub flight_number: Option<String>,
    pub passenger_count: i16,
    pub price: Option<BigDecimal>,
    pub is_completed: bool,
    pub is_paid: bool,
}

/// Validated partial update. `None` keeps the stored value; for the
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationChanges {
    pub license_plate: Option<String>,
    pub customer_name: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub return_date: Option<DateTime<Utc>>,
    pub flight_number: Option<Option<String>>,
    pub passenger_count: Option<i16>,
    pub price: Option<Option<BigDecimal>>,
    pub is_completed: Option<bool>,
    pub is_paid: Option<bool>,
}

// =============================================================================
// PRICING
// =============================================================================

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PricingSettings {
    pub id: i64,
    pub user_id: i64,
    pub day_1: BigDecimal,
    pub day_2: BigDecimal,
    pub day_3: BigDecimal,
    pub day_4: BigDecimal,
    pub day_5: BigDecimal,
    pub day_6: BigDecimal,
    pub day_7: BigDecimal,
    pub extra_day: BigDecimal,
}

/// Merge patch for a pricing table; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingChanges {
    pub day_1: Option<BigDecimal>,
    pub day_2: Option<BigDecimal>,
    pub day_3: Option<BigDecimal>,
    pub day_4: Option<BigDecimal>,
    pub day_5: Option<BigDecimal>,
    pub day_6: Option<BigDecimal>,
    pub day_7: Option<BigDecimal>,
    pub extra_day: Option<BigDecimal>,
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct PushSubscription {
    pub id: i64,
    pub user_id: i64,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PushRecipient {
    #[sqlx(flatten)]
    pub subscription: PushSubscription,
    pub username: String,
}
