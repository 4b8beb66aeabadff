//! Device status machine and loan state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::DomainError;

/// Availability status of a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    /// On the shelf, can be loaned
    Available,
    /// Held by an open loan
    Loaned,
    /// Permanently withdrawn
    Retired,
    /// Returned damaged, awaiting repair
    Damaged,
}

/// Who is asking for a status change.
///
/// The loan lifecycle owns every move into and out of `Loaned`; clients may
/// only shuffle a device between the remaining states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOrigin {
    Lifecycle,
    Client,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "available",
            DeviceStatus::Loaned => "loaned",
            DeviceStatus::Retired => "retired",
            DeviceStatus::Damaged => "damaged",
        }
    }

    /// Checks a move from `self` to `target`.
    ///
    /// `Ok(false)` means the move is a no-op (same state), `Ok(true)` means a
    /// write is required.
    pub fn check_transition(
        self,
        target: DeviceStatus,
        origin: StatusOrigin,
    ) -> Result<bool, DomainError> {
        let invalid = || {
            Err(DomainError::InvalidTransition(format!(
                "device cannot move from {} to {}",
                self, target
            )))
        };

        if target == DeviceStatus::Loaned {
            return match (origin, self) {
                (StatusOrigin::Lifecycle, DeviceStatus::Available) => Ok(true),
                _ => invalid(),
            };
        }

        if self == DeviceStatus::Loaned && origin == StatusOrigin::Client {
            return Err(DomainError::InvalidTransition(format!(
                "device is on an open loan; return the loan instead of setting {}",
                target
            )));
        }

        Ok(self != target)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(DeviceStatus::Available),
            "loaned" => Ok(DeviceStatus::Loaned),
            "retired" => Ok(DeviceStatus::Retired),
            "damaged" => Ok(DeviceStatus::Damaged),
            other => Err(DomainError::Validation(format!(
                "unknown device status '{}'",
                other
            ))),
        }
    }
}

/// A loan is open until it carries a check-in date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanState {
    Open,
    Closed,
}
