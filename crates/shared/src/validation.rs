//! Common validation utilities.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Maximum number of fractional digits accepted for a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Maximum total number of digits accepted for a price (8 integer + 2 fractional).
pub const PRICE_MAX_DIGITS: u32 = 10;

/// Builds a validation error with a human-readable message.
pub fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a monetary amount: non-negative, at most 2 decimal places,
/// at most 10 significant digits.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(field_error("price_negative", "Price must be non-negative"));
    }

    let normalized = price.normalize();
    if normalized.scale() > PRICE_DECIMAL_PLACES {
        return Err(field_error(
            "price_scale",
            "Price must have at most 2 decimal places",
        ));
    }

    let max = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if *price >= max {
        return Err(field_error(
            "price_digits",
            "Price must have at most 10 digits in total",
        ));
    }

    Ok(())
}

/// Rescales a validated price to exactly two fractional digits for storage
/// and display ("19999" becomes "19999.00").
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut value = price.round_dp(PRICE_DECIMAL_PLACES);
    value.rescale(PRICE_DECIMAL_PLACES);
    value
}
