//! Domain layer - Pure business abstractions
//!
//! Trait definitions, domain types, the device status machine and the
//! penalty engine. No Axum here; SeaORM only appears in the error conversion.

pub mod errors;
pub mod penalty;
pub mod repositories;
pub mod status;

pub use errors::DomainError;
pub use penalty::{compute_penalty, DamageAssessment, PenaltyOutcome};
pub use repositories::*;
pub use status::{DeviceStatus, LoanState, StatusOrigin};
