//! Fixed-point money handling shared by reservations and pricing.

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Deserializer};

/// Money accepted either as a JSON string ("45.10") or a JSON number
/// (45.1). Numbers go through their shortest textual form so no binary
/// floating point noise reaches the value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalInput {
    pub fn parse(&self) -> Option<BigDecimal> {
        match self {
            DecimalInput::Text(text) => BigDecimal::from_str(text.trim()).ok(),
            DecimalInput::Number(number) => {
                BigDecimal::from_str(&number.to_string()).ok()
            },
        }
    }
}

/// Checks a value against a `NUMERIC(max_digits, decimal_places)` column
/// and returns it rescaled to `decimal_places`.
pub fn check_decimal(
    value: &DecimalInput,
    max_digits: u64,
    decimal_places: i64,
) -> Result<BigDecimal, String> {
    let parsed = value
        .parse()
        .ok_or_else(|| String::from("A valid number is required."))?;
    let normalized = parsed.normalized();
    let (units, scale) = normalized.as_bigint_and_exponent();

    if scale > decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            decimal_places
        ));
    }

    // Digits left of the point, from the digit count and exponent alone.
    let whole_digits = if units.is_zero() {
        0
    } else {
        (normalized.digits() as i64 - scale).max(0)
    };

    if whole_digits > max_digits as i64 - decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            max_digits
        ));
    }

    Ok(parsed.with_scale(decimal_places))
}

/// Renders money the way it is stored: always two decimal places.
pub fn money(value: &BigDecimal) -> String {
    let (cents, _) = value.with_scale(2).into_bigint_and_exponent();
    let cents = cents.to_string();
    let (sign, digits) = match cents.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", cents.as_str()),
    };
    let digits = format!("{:0>3}", digits);
    let (whole, fraction) = digits.split_at(digits.len() - 2);

    format!("{}{}.{}", sign, whole, fraction)
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in patch bodies.
pub fn double_option<'de, T, D>(
    deserializer: D,
) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> DecimalInput {
        DecimalInput::Text(value.to_owned())
    }

    #[test]
    fn test_number_input_has_no_float_noise() {
        let input: DecimalInput = serde_json::from_str("45.1").unwrap();
        let value = check_decimal(&input, 6, 2).unwrap();
        assert_eq!(money(&value), "45.10");
    }

    #[test]
    fn test_rejects_too_many_decimal_places() {
        let err = check_decimal(&text("1.005"), 6, 2).unwrap_err();
        assert!(err.contains("decimal places"), "{}", err);
    }

    #[test]
    fn test_rejects_too_many_digits() {
        assert!(check_decimal(&text("9999.99"), 6, 2).is_ok());
        let err = check_decimal(&text("10000.00"), 6, 2).unwrap_err();
        assert!(err.contains("digits in total"), "{}", err);
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_decimals() {
        let value = check_decimal(&text("12.500"), 6, 2).unwrap();
        assert_eq!(money(&value), "12.50");
    }

    #[test]
    fn test_huge_exponent_is_rejected_without_expansion() {
        for value in ["1e999999999", "-7E2000000000", "9.5e18"] {
            let err = check_decimal(&text(value), 8, 2).unwrap_err();
            assert!(err.contains("digits in total"), "{}: {}", value, err);
        }
        let err = check_decimal(&text("1e-999999999"), 8, 2).unwrap_err();
        assert!(err.contains("decimal places"), "{}", err);
    }

    #[test]
    fn test_exponent_within_bounds_is_accepted() {
        let value = check_decimal(&text("1.5e3"), 6, 2).unwrap();
        assert_eq!(money(&value), "1500.00");
        let value = check_decimal(&text("25E-2"), 6, 2).unwrap();
        assert_eq!(money(&value), "0.25");
    }

    #[test]
    fn test_zero_keeps_two_decimals() {
        let value = check_decimal(&text("0.00"), 8, 2).unwrap();
        assert_eq!(money(&value), "0.00");
        assert_eq!(money(&BigDecimal::from(0)), "0.00");
        assert_eq!(money(&BigDecimal::from_str("0.05").unwrap()), "0.05");
        assert_eq!(money(&BigDecimal::from_str("-3.5").unwrap()), "-3.50");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(check_decimal(&text("abc"), 8, 2).is_err());
    }
}
