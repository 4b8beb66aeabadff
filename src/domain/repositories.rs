//! Repository trait definitions
//!
//! These traits define the read contract for data access.
//! Implementations live in the infrastructure layer; writes go through the
//! services, which own the transactional lifecycle rules.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::status::{DeviceStatus, LoanState};
use super::DomainError;

/// Device category with its penalty schedule
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub daily_late_rate: Decimal,
    pub damage_fee: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub daily_late_rate: Option<Decimal>,
    #[serde(default)]
    pub damage_fee: Option<Decimal>,
}

/// Device data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Device {
    pub id: i32,
    pub name: String,
    pub tis_id: String,
    pub category_id: i32,
    pub category_name: Option<String>,
    pub details: Option<String>,
    pub notes: Option<String>,
    pub status: DeviceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter criteria for device queries
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DeviceFilter {
    pub status: Option<DeviceStatus>,
    pub category_id: Option<i32>,
}

/// Input for registering a device
///
/// Required fields are optional here so that a missing one surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterDeviceInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tis_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<DeviceStatus>,
}

/// Input for editing a device's descriptive fields
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDeviceInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tis_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One borrowing episode of a device
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub device_id: i32,
    pub category_name: String,
    pub device_name: String,
    pub due_date: DateTime<Utc>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub return_flag: bool,
    pub penalty: Decimal,
    pub damaged_penalty: Decimal,
    pub deduction: Decimal,
    pub daily_late_rate: Decimal,
    pub comments: Option<String>,
    pub course_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    pub fn state(&self) -> LoanState {
        if self.check_in_date.is_some() {
            LoanState::Closed
        } else {
            LoanState::Open
        }
    }

    /// Penalties owed after the deduction, derived on read.
    pub fn amount_due(&self) -> Decimal {
        (self.penalty + self.damaged_penalty - self.deduction).max(Decimal::ZERO)
    }
}

/// Filter criteria for loan queries
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoanFilter {
    pub open: Option<bool>,
    pub device_id: Option<i32>,
    pub course_id: Option<i32>,
}

/// The check-out record opening a loan
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LoanDetail {
    pub id: i32,
    pub loan_id: i32,
    pub patron_id: String,
    pub check_out_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub late: bool,
}

/// Filter criteria for loan detail queries
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoanDetailFilter {
    pub loan_id: Option<i32>,
    pub patron_id: Option<String>,
}

/// Input for opening a loan
#[derive(Debug, Clone)]
pub struct OpenLoanInput {
    pub device_id: i32,
    pub course_id: i32,
    pub due_date: DateTime<Utc>,
    pub patron_id: String,
    pub check_out_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub detail_notes: Option<String>,
}

/// Damage reported by the caller when a device comes back
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct DamageReport {
    pub damaged: bool,
    /// Overrides the category's damage fee when present
    #[serde(default)]
    pub fee: Option<Decimal>,
}

/// Input for closing a loan
#[derive(Debug, Clone)]
pub struct CloseLoanInput {
    pub check_in_date: DateTime<Utc>,
    pub damage: Option<DamageReport>,
    pub deduction: Option<Decimal>,
    pub comments: Option<String>,
}

/// Free-text edits allowed on a loan
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnnotateLoanInput {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Free-text edit allowed on a check-out record
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnnotateLoanDetailInput {
    #[serde(default)]
    pub notes: Option<String>,
}

/// A freshly opened loan together with its check-out record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanReceipt {
    pub loan: Loan,
    pub detail: LoanDetail,
}

/// Repository trait for DeviceCategory entity
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find all categories ordered by name
    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;

    /// Find a category by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError>;
}

/// Repository trait for Device entity
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Find all devices matching the filter, with category names
    async fn find_all(&self, filter: DeviceFilter) -> Result<Vec<Device>, DomainError>;

    /// Find a device by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Device>, DomainError>;
}

/// Repository trait for Loan entity
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find all loans matching the filter, newest first
    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<Loan>, DomainError>;

    /// Find a loan by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Loan>, DomainError>;

    /// Open loans whose due date is before `now`
    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Loan>, DomainError>;
}

/// Repository trait for LoanDetail entity
#[async_trait]
pub trait LoanDetailRepository: Send + Sync {
    async fn find_all(&self, filter: LoanDetailFilter) -> Result<Vec<LoanDetail>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<LoanDetail>, DomainError>;

    /// The check-out record of a loan
    async fn find_by_loan_id(&self, loan_id: i32) -> Result<Option<LoanDetail>, DomainError>;
}
