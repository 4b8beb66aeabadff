//! Loan Service - the loan lifecycle
//!
//! `open_loan` and `close_loan` each run in one transaction: the loan, its
//! check-out record and the device status change either all land or none do.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

use super::device_service;
use crate::domain::{
    compute_penalty, AnnotateLoanDetailInput, AnnotateLoanInput, CloseLoanInput,
    DamageAssessment, DamageReport, DeviceStatus, DomainError, Loan, LoanDetail, LoanReceipt,
    OpenLoanInput,
};
use crate::models::device::Entity as Device;
use crate::models::device_category::Entity as DeviceCategory;
use crate::models::loan::{self, Entity as LoanEntity};
use crate::models::loan_detail::{self, Entity as LoanDetailEntity};
use crate::utils::money::{checked_amount, from_minor_units, to_minor_units};
use crate::utils::time::{self, format_timestamp, normalize};

/// Open a loan: claim the device, create the loan and its check-out record
pub async fn open_loan(
    db: &DatabaseConnection,
    input: OpenLoanInput,
) -> Result<LoanReceipt, DomainError> {
    let patron_id = input.patron_id.trim().to_string();
    if patron_id.is_empty() {
        return Err(DomainError::Validation("patron_id is required".to_string()));
    }

    let check_out_date = normalize(input.check_out_date);
    let due_date = normalize(input.due_date);
    if due_date <= check_out_date {
        return Err(DomainError::Validation(
            "due_date must be after check_out_date".to_string(),
        ));
    }

    let txn = db.begin().await?;

    // 1. Claim the device (available -> loaned)
    let device = device_service::claim_for_loan(&txn, input.device_id).await?;

    let category = DeviceCategory::find_by_id(device.category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", device.category_id))?;

    // 2. Create Loan
    let new_loan = loan::ActiveModel {
        device_id: Set(device.id),
        category_name: Set(category.name),
        device_name: Set(device.name),
        due_date: Set(format_timestamp(due_date)),
        check_in_date: Set(None),
        notes: Set(input.notes),
        return_flag: Set(false),
        penalty_cents: Set(0),
        damaged_penalty_cents: Set(0),
        deduction_cents: Set(0),
        daily_late_rate_cents: Set(category.daily_late_rate_cents),
        comments: Set(None),
        course_id: Set(input.course_id),
        created_at: Set(format_timestamp(check_out_date)),
        updated_at: Set(format_timestamp(time::now())),
        ..Default::default()
    };
    let saved_loan = new_loan.insert(&txn).await?;

    // 3. Create the check-out record
    let new_detail = loan_detail::ActiveModel {
        loan_id: Set(saved_loan.id),
        patron_id: Set(patron_id),
        check_out_date: Set(format_timestamp(check_out_date)),
        notes: Set(input.detail_notes),
        late: Set(false),
        ..Default::default()
    };
    let saved_detail = new_detail.insert(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Loan {} opened: device {} to patron {} until {}",
        saved_loan.id,
        saved_loan.device_id,
        saved_detail.patron_id,
        saved_loan.due_date
    );

    Ok(LoanReceipt {
        loan: Loan::try_from(saved_loan)?,
        detail: LoanDetail::try_from(saved_detail)?,
    })
}

/// Close (return) a loan, computing lateness and penalties
pub async fn close_loan(
    db: &DatabaseConnection,
    id: i32,
    input: CloseLoanInput,
) -> Result<Loan, DomainError> {
    let check_in_date = normalize(input.check_in_date);
    let deduction = checked_amount("deduction", input.deduction)?;
    if let Some(report) = &input.damage {
        checked_amount("damage fee", report.fee)?;
    }

    let txn = db.begin().await?;

    // 1. Find Loan
    let existing = LoanEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan", id))?;

    if existing.check_in_date.is_some() {
        return Err(DomainError::AlreadyClosed(id));
    }

    let open = Loan::try_from(existing)?;
    if check_in_date < open.created_at {
        return Err(DomainError::Validation(
            "check_in_date must not be before the check-out".to_string(),
        ));
    }

    // 2. Compute penalties
    let damage = resolve_damage(&txn, open.device_id, input.damage).await?;
    let outcome = compute_penalty(open.due_date, check_in_date, open.daily_late_rate, &damage);

    if deduction > outcome.total() {
        return Err(DomainError::Validation(format!(
            "deduction {} exceeds penalties of {}",
            deduction,
            outcome.total()
        )));
    }

    // 3. Record the check-in, unless someone else already did
    let mut update = LoanEntity::update_many()
        .col_expr(
            loan::Column::CheckInDate,
            Expr::value(format_timestamp(check_in_date)),
        )
        .col_expr(loan::Column::ReturnFlag, Expr::value(true))
        .col_expr(
            loan::Column::PenaltyCents,
            Expr::value(to_minor_units(outcome.penalty)?),
        )
        .col_expr(
            loan::Column::DamagedPenaltyCents,
            Expr::value(to_minor_units(outcome.damaged_penalty)?),
        )
        .col_expr(
            loan::Column::DeductionCents,
            Expr::value(to_minor_units(deduction)?),
        )
        .col_expr(
            loan::Column::UpdatedAt,
            Expr::value(format_timestamp(time::now())),
        );
    if let Some(comments) = input.comments {
        update = update.col_expr(loan::Column::Comments, Expr::value(comments));
    }

    let result = update
        .filter(loan::Column::Id.eq(id))
        .filter(loan::Column::CheckInDate.is_null())
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(DomainError::AlreadyClosed(id));
    }

    LoanDetailEntity::update_many()
        .col_expr(loan_detail::Column::Late, Expr::value(outcome.late))
        .filter(loan_detail::Column::LoanId.eq(id))
        .exec(&txn)
        .await?;

    // 4. Hand the device back
    let target = if damage.damaged {
        DeviceStatus::Damaged
    } else {
        DeviceStatus::Available
    };
    device_service::release_from_loan(&txn, open.device_id, target).await?;

    let closed = LoanEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan", id))?;

    txn.commit().await?;

    tracing::info!(
        "Loan {} closed: late={} ({} day(s)), penalty={}, damaged_penalty={}, device {} -> {}",
        id,
        outcome.late,
        outcome.late_days,
        outcome.penalty,
        outcome.damaged_penalty,
        open.device_id,
        target
    );

    Loan::try_from(closed)
}

/// Edit the free-text fields of a loan
pub async fn annotate_loan(
    db: &DatabaseConnection,
    id: i32,
    input: AnnotateLoanInput,
) -> Result<Loan, DomainError> {
    let existing = LoanEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan", id))?;

    if input.notes.is_none() && input.comments.is_none() {
        return Loan::try_from(existing);
    }

    let mut active: loan::ActiveModel = existing.into();
    if let Some(notes) = input.notes {
        active.notes = Set(Some(notes));
    }
    if let Some(comments) = input.comments {
        active.comments = Set(Some(comments));
    }
    active.updated_at = Set(format_timestamp(time::now()));

    let updated = active.update(db).await?;
    Loan::try_from(updated)
}

/// Edit the notes of a check-out record. Patron, dates and lateness stay as
/// the lifecycle recorded them.
pub async fn annotate_loan_detail(
    db: &DatabaseConnection,
    id: i32,
    input: AnnotateLoanDetailInput,
) -> Result<LoanDetail, DomainError> {
    let existing = LoanDetailEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan detail", id))?;

    let Some(notes) = input.notes else {
        return LoanDetail::try_from(existing);
    };

    let mut active: loan_detail::ActiveModel = existing.into();
    active.notes = Set(Some(notes));

    let updated = active.update(db).await?;
    LoanDetail::try_from(updated)
}

/// Administrative delete of a closed loan and its check-out record
pub async fn delete_loan(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    let existing = LoanEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan", id))?;

    if existing.check_in_date.is_none() {
        return Err(DomainError::InvalidTransition(format!(
            "loan {} is still open; return the device before deleting it",
            id
        )));
    }

    LoanDetailEntity::delete_many()
        .filter(loan_detail::Column::LoanId.eq(id))
        .exec(&txn)
        .await?;
    LoanEntity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!("Loan {} deleted", id);

    Ok(())
}

/// Turn the caller's report into a fixed fee. Without an explicit fee the
/// device category's damage fee applies.
async fn resolve_damage<C: ConnectionTrait>(
    conn: &C,
    device_id: i32,
    report: Option<DamageReport>,
) -> Result<DamageAssessment, DomainError> {
    let report = match report {
        Some(report) if report.damaged => report,
        _ => return Ok(DamageAssessment::none()),
    };

    if let Some(fee) = report.fee {
        return Ok(DamageAssessment::damaged(fee));
    }

    let device = Device::find_by_id(device_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", device_id))?;
    let category = DeviceCategory::find_by_id(device.category_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", device.category_id))?;

    Ok(DamageAssessment::damaged(from_minor_units(
        category.damage_fee_cents,
    )))
}
