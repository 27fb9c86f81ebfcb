use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, FieldErrors},
    model::{PricingChanges, PricingSettings},
};

use super::decimal::{check_decimal, money, DecimalInput};

const PRICE_DIGITS: u64 = 6;
const PRICE_DECIMALS: i64 = 2;

/// Default schedule in cents: day 1 through day 7, then the extra day.
const DEFAULT_PRICING: [i64; 8] = [5000, 9000, 13000, 17000, 20000, 23000, 25000, 2000];

pub fn default_pricing() -> [BigDecimal; 8] {
    DEFAULT_PRICING.map(|cents| BigDecimal::new(cents.into(), PRICE_DECIMALS))
}

#[derive(Debug, Default, Deserialize)]
pub struct PricingRequest {
    pub day_1: Option<DecimalInput>,
    pub day_2: Option<DecimalInput>,
    pub day_3: Option<DecimalInput>,
    pub day_4: Option<DecimalInput>,
    pub day_5: Option<DecimalInput>,
    pub day_6: Option<DecimalInput>,
    pub day_7: Option<DecimalInput>,
    pub extra_day: Option<DecimalInput>,
}

impl PricingRequest {
    /// Merge patch: every supplied field is validated, absent ones are
    /// left as stored.
    pub fn validate(&self) -> Result<PricingChanges, Error> {
        let mut errors = FieldErrors::new();

        let mut check = |name: &str, value: &Option<DecimalInput>| {
            let value = value.as_ref()?;
            match check_decimal(value, PRICE_DIGITS, PRICE_DECIMALS) {
                Ok(value) => Some(value),
                Err(message) => {
                    errors.entry(name.to_owned()).or_default().push(message);
                    None
                },
            }
        };

        let changes = PricingChanges {
            day_1: check("day_1", &self.day_1),
            day_2: check("day_2", &self.day_2),
            day_3: check("day_3", &self.day_3),
            day_4: check("day_4", &self.day_4),
            day_5: check("day_5", &self.day_5),
            day_6: check("day_6", &self.day_6),
            day_7: check("day_7", &self.day_7),
            extra_day: check("extra_day", &self.extra_day),
        };

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(changes)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PricingResponse {
    pub id: i64,
    pub day_1: String,
    pub day_2: String,
    pub day_3: String,
    pub day_4: String,
    pub day_5: String,
    pub day_6: String,
    pub day_7: String,
    pub extra_day: String,
}

impl From<&PricingSettings> for PricingResponse {
    fn from(settings: &PricingSettings) -> Self {
        PricingResponse {
            id: settings.id,
            day_1: money(&settings.day_1),
            day_2: money(&settings.day_2),
            day_3: money(&settings.day_3),
            day_4: money(&settings.day_4),
            day_5: money(&settings.day_5),
            day_6: money(&settings.day_6),
            day_7: money(&settings.day_7),
            extra_day: money(&settings.extra_day),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    #[serde(rename = "returnDate")]
    pub return_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub days: i64,
    pub price: String,
}

/// Whole days from `now` until `return_date`, any started day counted.
pub fn days_until(now: DateTime<Utc>, return_date: DateTime<Utc>) -> i64 {
    let seconds = (return_date - now).num_seconds();
    if seconds <= 0 {
        return 0;
    }

    (seconds + 86_399) / 86_400
}

pub fn quote(settings: &PricingSettings, days: i64) -> BigDecimal {
    let price = match days {
        i64::MIN..=0 => BigDecimal::zero(),
        1 => settings.day_1.clone(),
        2 => settings.day_2.clone(),
        3 => settings.day_3.clone(),
        4 => settings.day_4.clone(),
        5 => settings.day_5.clone(),
        6 => settings.day_6.clone(),
        7 => settings.day_7.clone(),
        _ => &settings.day_7 + &settings.extra_day * BigDecimal::from(days - 7),
    };

    price.with_scale(PRICE_DECIMALS)
}
