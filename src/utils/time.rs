//! Timestamp storage format
//!
//! Timestamps are stored as RFC 3339 text with millisecond precision and a
//! `Z` suffix, so that string order matches chronological order in SQL.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::domain::DomainError;

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Drop precision the storage format cannot hold.
pub fn normalize(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

pub fn now() -> DateTime<Utc> {
    normalize(Utc::now())
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DomainError::Database(format!("invalid stored timestamp '{}': {}", raw, e)))
}
