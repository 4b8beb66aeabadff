//! Services Layer
//!
//! Business rules for the device registry and the loan lifecycle, kept out
//! of the HTTP handlers. Every write that spans more than one row runs in a
//! single transaction on the connection passed in by the caller.

pub mod category_service;
pub mod device_service;
pub mod loan_service;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Trimmed, non-empty text or a validation error naming the field.
pub(crate) fn required_text(field: &str, value: Option<String>) -> Result<String, DomainError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::Validation(format!("{} is required", field))),
    }
}

/// A unique index rejected the write: a concurrent request registered the
/// same value between the lookup and the insert.
pub(crate) fn unique_violation(err: DbErr, message: impl FnOnce() -> String) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Validation(message()),
        _ => DomainError::from(err),
    }
}
