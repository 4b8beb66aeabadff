//! Conversions between decimal amounts and stored minor units (cents)

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::penalty::{round_currency, CURRENCY_SCALE};
use crate::domain::DomainError;

pub fn from_minor_units(units: i64) -> Decimal {
    Decimal::new(units, CURRENCY_SCALE)
}

pub fn to_minor_units(amount: Decimal) -> Result<i64, DomainError> {
    let scaled = round_currency(amount)
        .checked_mul(Decimal::from(10_i64.pow(CURRENCY_SCALE)))
        .and_then(|v| v.to_i64());

    scaled.ok_or_else(|| DomainError::Validation(format!("amount {} is out of range", amount)))
}

/// Largest rate, fee or deduction accepted from a caller.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

/// Validate a caller-supplied amount: defaults to zero, never negative and
/// never above `MAX_AMOUNT`, so penalties computed from it fit in cents.
pub fn checked_amount(field: &str, amount: Option<Decimal>) -> Result<Decimal, DomainError> {
    let amount = amount.unwrap_or(Decimal::ZERO);
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::Validation(format!(
            "{} must not be negative",
            field
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(DomainError::Validation(format!(
            "{} must not exceed {}",
            field, MAX_AMOUNT
        )));
    }
    Ok(amount)
}
