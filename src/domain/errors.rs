//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Every lifecycle operation returns one of these instead of applying a
//! partial write.

use std::fmt;

use super::status::DeviceStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed or missing input; never accompanied by a write
    Validation(String),
    /// Referenced device, category, loan or loan detail does not exist
    NotFound(String),
    /// A loan was requested for a device that is not available
    DeviceUnavailable { device_id: i32, status: DeviceStatus },
    /// Close attempted on a loan that already has a check-in date
    AlreadyClosed(i32),
    /// Status change or delete not permitted from the current state
    InvalidTransition(String),
    /// Database/persistence error
    Database(String),
}

impl DomainError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        DomainError::NotFound(format!("{} {} not found", entity, id))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::NotFound(msg) => write!(f, "{}", msg),
            DomainError::DeviceUnavailable { device_id, status } => {
                write!(f, "Device {} is not available (status: {})", device_id, status)
            }
            DomainError::AlreadyClosed(id) => write!(f, "Loan {} is already closed", id),
            DomainError::InvalidTransition(msg) => write!(f, "Invalid transition: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
