//! Penalty engine
//!
//! Pure computation of lateness and monetary penalties for a returned loan.
//! Nothing here touches the database or the clock: the same inputs always
//! produce the same outcome, which keeps close operations auditable.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Number of fractional digits of the smallest currency unit.
pub const CURRENCY_SCALE: u32 = 2;

/// Caller's judgment of the returned device, resolved to a fixed fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageAssessment {
    pub damaged: bool,
    pub fixed_fee: Decimal,
}

impl DamageAssessment {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn damaged(fixed_fee: Decimal) -> Self {
        Self {
            damaged: true,
            fixed_fee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenaltyOutcome {
    pub late: bool,
    pub late_days: i64,
    pub penalty: Decimal,
    pub damaged_penalty: Decimal,
}

impl PenaltyOutcome {
    pub fn total(&self) -> Decimal {
        self.penalty + self.damaged_penalty
    }
}

/// Round to the smallest currency unit, never below zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount
        .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
}

/// Whole days late, counting any started day as a full one.
pub fn late_days(due_date: DateTime<Utc>, check_in: DateTime<Utc>) -> i64 {
    if check_in <= due_date {
        return 0;
    }

    let overdue = check_in - due_date;
    let days = overdue.num_days();
    if overdue > Duration::days(days) {
        days + 1
    } else {
        days
    }
}

pub fn compute_penalty(
    due_date: DateTime<Utc>,
    check_in: DateTime<Utc>,
    daily_late_rate: Decimal,
    damage: &DamageAssessment,
) -> PenaltyOutcome {
    let late = check_in > due_date;
    let late_days = late_days(due_date, check_in);

    let penalty = Decimal::from(late_days)
        .checked_mul(daily_late_rate)
        .map(round_currency)
        .unwrap_or(Decimal::MAX);

    let damaged_penalty = if damage.damaged {
        round_currency(damage.fixed_fee)
    } else {
        Decimal::ZERO
    };

    PenaltyOutcome {
        late,
        late_days,
        penalty,
        damaged_penalty,
    }
}
