use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, FieldErrors},
    model::{NewReservation, Reservation, ReservationChanges},
};

use super::decimal::{check_decimal, double_option, money, DecimalInput};

const LICENSE_PLATE_LENGTH: usize = 20;
const CUSTOMER_NAME_LENGTH: usize = 100;
const PHONE_NUMBER_LENGTH: usize = 20;
const FLIGHT_NUMBER_LENGTH: usize = 10;
const PRICE_DIGITS: u64 = 8;
const PRICE_DECIMALS: i64 = 2;

pub const MISSING_FLIGHT_NUMBER: &str = "Brak numeru lotu dla tej rezerwacji";

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";

/// Reservation body for create, full and partial update. Keys follow the
/// client contract; `id`, `owner` and `created_at` are ignored if sent.
#[derive(Debug, Default, Deserialize)]
pub struct ReservationRequest {
    #[serde(rename = "licensePlate", default, deserialize_with = "double_option")]
    pub license_plate: Option<Option<String>>,
    #[serde(rename = "customerName", default, deserialize_with = "double_option")]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(rename = "returnDate", default, deserialize_with = "double_option")]
    pub return_date: Option<Option<DateTime<Utc>>>,
    #[serde(rename = "flightNumber", default, deserialize_with = "double_option")]
    pub flight_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub passenger_count: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub price: Option<Option<DecimalInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub is_completed: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    pub is_paid: Option<Option<bool>>,
}

struct Checker {
    errors: FieldErrors,
    partial: bool,
}

impl Checker {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Non-nullable field: `null` is rejected, absence only when the
    /// request is a full write.
    fn required<T: Clone>(
        &mut self,
        field: &str,
        value: &Option<Option<T>>,
    ) -> Option<T> {
        match value {
            Some(Some(value)) => Some(value.clone()),
            Some(None) => {
                self.fail(field, NOT_NULL);
                None
            },
            None => {
                if !self.partial {
                    self.fail(field, REQUIRED);
                }
                None
            },
        }
    }

    fn text(&mut self, field: &str, value: Option<String>, max: usize) -> Option<String> {
        let value = value?;
        if value.trim().is_empty() {
            self.fail(field, NOT_BLANK);
            return None;
        }
        self.length(field, value, max)
    }

    fn length(&mut self, field: &str, value: String, max: usize) -> Option<String> {
        if value.chars().count() > max {
            self.fail(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
        Some(value)
    }

    fn optional_text(
        &mut self,
        field: &str,
        value: &Option<Option<String>>,
        max: usize,
    ) -> Option<Option<String>> {
        match value {
            Some(Some(text)) => {
                self.length(field, text.clone(), max).map(Some)
            },
            Some(None) => Some(None),
            None => None,
        }
    }

    fn passenger_count(&mut self, value: Option<i64>) -> Option<i16> {
        let value = value?;
        if value < 0 {
            self.fail(
                "passenger_count",
                "Ensure this value is greater than or equal to 0.",
            );
            return None;
        }
        match i16::try_from(value) {
            Ok(value) => Some(value),
            Err(_) => {
                self.fail(
                    "passenger_count",
                    "Ensure this value is less than or equal to 32767.",
                );
                None
            },
        }
    }

    fn price(
        &mut self,
        value: &Option<Option<DecimalInput>>,
    ) -> Option<Option<BigDecimal>> {
        match value {
            Some(Some(input)) => {
                match check_decimal(input, PRICE_DIGITS, PRICE_DECIMALS) {
                    Ok(value) => Some(Some(value)),
                    Err(message) => {
                        self.fail("price", message);
                        None
                    },
                }
            },
            Some(None) => Some(None),
            None => None,
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Error> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

impl ReservationRequest {
    /// Validates the body for an insert, filling in the defaults for
    /// every optional field.
    pub fn into_new(self) -> Result<NewReservation, Error> {
        let mut checker = Checker {
            errors: FieldErrors::new(),
            partial: false,
        };

        let changes = self.check(&mut checker);
        let license_plate = changes.license_plate;
        let customer_name = changes.customer_name;
        let return_date = changes.return_date;

        let reservation = match (license_plate, customer_name, return_date) {
            (Some(license_plate), Some(customer_name), Some(return_date)) => {
                Some(NewReservation {
                    license_plate,
                    customer_name,
                    phone_number: changes.phone_number.flatten(),
                    return_date,
                    flight_number: changes.flight_number.flatten(),
                    passenger_count: changes.passenger_count.unwrap_or(1),
                    price: changes.price.flatten(),
                    is_completed: changes.is_completed.unwrap_or(false),
                    is_paid: changes.is_paid.unwrap_or(false),
                })
            },
            _ => None,
        };

        match (checker.finish(()), reservation) {
            (Ok(()), Some(reservation)) => Ok(reservation),
            (Err(e), _) => Err(e),
            (Ok(()), None) => Err(Error::BadRequest(String::from(REQUIRED))),
        }
    }

    /// Validates the body for an update. A full update (`partial` false)
    /// requires the same fields as an insert.
    pub fn into_changes(self, partial: bool) -> Result<ReservationChanges, Error> {
        let mut checker = Checker {
            errors: FieldErrors::new(),
            partial,
        };

        let changes = self.check(&mut checker);
        checker.finish(changes)
    }

    fn check(&self, checker: &mut Checker) -> ReservationChanges {
        let license_plate = checker.required("licensePlate", &self.license_plate);
        let license_plate =
            checker.text("licensePlate", license_plate, LICENSE_PLATE_LENGTH);

        let customer_name = checker.required("customerName", &self.customer_name);
        let customer_name =
            checker.text("customerName", customer_name, CUSTOMER_NAME_LENGTH);

        let return_date = checker.required("returnDate", &self.return_date);

        let phone_number =
            checker.optional_text("phone_number", &self.phone_number, PHONE_NUMBER_LENGTH);
        let flight_number = checker.optional_text(
            "flightNumber",
            &self.flight_number,
            FLIGHT_NUMBER_LENGTH,
        );

        let passenger_count = match &self.passenger_count {
            Some(Some(value)) => checker.passenger_count(Some(*value)),
            Some(None) => {
                checker.fail("passenger_count", NOT_NULL);
                None
            },
            None => None,
        };

        let price = checker.price(&self.price);

        let is_completed = match self.is_completed {
            Some(None) => {
                checker.fail("is_completed", NOT_NULL);
                None
            },
            value => value.flatten(),
        };
        let is_paid = match self.is_paid {
            Some(None) => {
                checker.fail("is_paid", NOT_NULL);
                None
            },
            value => value.flatten(),
        };

        ReservationChanges {
            license_plate,
            customer_name,
            phone_number,
            return_date,
            flight_number,
            passenger_count,
            price,
            is_completed,
            is_paid,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: i64,
    pub owner: i64,
    #[serde(rename = "licensePlate")]
    pub license_plate: String,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub phone_number: Option<String>,
    #[serde(rename = "returnDate")]
    pub return_date: DateTime<Utc>,
    #[serde(rename = "flightNumber")]
    pub flight_number: Option<String>,
    pub passenger_count: i16,
    pub price: Option<String>,
    pub is_completed: bool,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        ReservationResponse {
            id: reservation.id,
            owner: reservation.owner_id,
            license_plate: reservation.license_plate,
            customer_name: reservation.customer_name,
            phone_number: reservation.phone_number,
            return_date: reservation.return_date,
            flight_number: reservation.flight_number,
            passenger_count: reservation.passenger_count,
            price: reservation.price.as_ref().map(money),
            is_completed: reservation.is_completed,
            is_paid: reservation.is_paid,
            created_at: reservation.created_at,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FlightStatus {
    pub flight_number: String,
    pub status: &'static str,
    pub scheduled_time: DateTime<Utc>,
    pub estimated_time: DateTime<Utc>,
    pub terminal: &'static str,
    pub delay: i32,
}

impl FlightStatus {
    /// Status for the reservation's flight, scheduled on its return date.
    pub fn for_reservation(reservation: &Reservation) -> Result<FlightStatus, Error> {
        let flight_number = reservation
            .flight_number
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::BadRequest(String::from(MISSING_FLIGHT_NUMBER)))?;

        Ok(FlightStatus {
            flight_number: flight_number.to_owned(),
            status: "On Time",
            scheduled_time: reservation.return_date,
            estimated_time: reservation.return_date,
            terminal: "A",
            delay: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn request(body: &str) -> ReservationRequest {
        serde_json::from_str(body).unwrap()
    }

    fn reservation(flight_number: Option<&str>) -> Reservation {
        Reservation {
            id: 1,
            owner_id: 2,
            license_plate: String::from("ABC123"),
            customer_name: String::from("Jan Kowalski"),
            phone_number: None,
            return_date: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            flight_number: flight_number.map(str::to_owned),
            passenger_count: 1,
            price: None,
            is_completed: false,
            is_paid: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_applies_defaults() {
        let new = request(
            r#"{
                "licensePlate": "ABC123",
                "customerName": "Jan Kowalski",
                "returnDate": "2025-06-01T10:00:00Z",
                "owner": 999
            }"#,
        )
        .into_new()
        .unwrap();

        assert_eq!(new.passenger_count, 1);
        assert!(!new.is_completed);
        assert!(!new.is_paid);
        assert_eq!(new.flight_number, None);
        assert_eq!(
            new.return_date,
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_create_reports_each_missing_field() {
        match request(r#"{"customerName": null}"#).into_new() {
            Err(Error::Validation(fields)) => {
                assert_eq!(fields["licensePlate"], vec![REQUIRED]);
                assert_eq!(fields["customerName"], vec![NOT_NULL]);
                assert_eq!(fields["returnDate"], vec![REQUIRED]);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_create_enforces_lengths_and_ranges() {
        let body = r#"{
            "licensePlate": "ABCDEFGHIJKLMNOPQRSTU",
            "customerName": "Jan",
            "returnDate": "2025-06-01T10:00:00Z",
            "flightNumber": "LO12345678X",
            "passenger_count": -1,
            "price": "1.234"
        }"#;

        match request(body).into_new() {
            Err(Error::Validation(fields)) => {
                assert!(fields.contains_key("licensePlate"));
                assert!(fields.contains_key("flightNumber"));
                assert!(fields.contains_key("passenger_count"));
                assert!(fields.contains_key("price"));
                assert!(!fields.contains_key("customerName"));
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_partial_update_keeps_absent_and_clears_null() {
        let changes = request(r#"{"flightNumber": null, "price": 120.5}"#)
            .into_changes(true)
            .unwrap();

        assert_eq!(changes.license_plate, None);
        assert_eq!(changes.flight_number, Some(None));
        assert_eq!(changes.phone_number, None);
        assert_eq!(
            changes.price,
            Some(BigDecimal::from_str("120.50").ok())
        );
    }

    #[test]
    fn test_full_update_requires_fields() {
        assert!(request(r#"{"is_paid": true}"#).into_changes(false).is_err());
        assert!(request(r#"{"is_paid": true}"#).into_changes(true).is_ok());
    }

    #[test]
    fn test_response_uses_client_field_names() {
        let mut record = reservation(Some("LO123"));
        record.price = BigDecimal::from_str("45.5").ok();

        let json = serde_json::to_value(ReservationResponse::from(record)).unwrap();
        assert_eq!(json["licensePlate"], "ABC123");
        assert_eq!(json["owner"], 2);
        assert_eq!(json["flightNumber"], "LO123");
        assert_eq!(json["price"], "45.50");
        assert_eq!(json["is_completed"], false);
    }

    #[test]
    fn test_flight_status_requires_flight_number() {
        match FlightStatus::for_reservation(&reservation(None)) {
            Err(Error::BadRequest(message)) => {
                assert_eq!(message, MISSING_FLIGHT_NUMBER)
            },
            other => panic!("unexpected {:?}", other),
        }
        assert!(FlightStatus::for_reservation(&reservation(Some(" "))).is_err());
    }

    #[test]
    fn test_flight_status_mirrors_return_date() {
        let record = reservation(Some("LO123"));
        let status = FlightStatus::for_reservation(&record).unwrap();

        assert_eq!(status.status, "On Time");
        assert_eq!(status.terminal, "A");
        assert_eq!(status.delay, 0);
        assert_eq!(status.scheduled_time, record.return_date);
        assert_eq!(status.estimated_time, record.return_date);
    }
}
