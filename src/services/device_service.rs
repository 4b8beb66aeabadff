//! Device Service - registry writes and the device status machine
//!
//! Status changes are compare-and-set updates guarded by the status that was
//! read, so a concurrent loan cannot slip between the check and the write.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use super::{required_text, unique_violation};
use crate::domain::{
    Device, DeviceStatus, DomainError, RegisterDeviceInput, StatusOrigin, UpdateDeviceInput,
};
use crate::models::device::{self, Entity as DeviceEntity};
use crate::models::device_category::{self, Entity as DeviceCategory};
use crate::models::loan::{self, Entity as Loan};
use crate::utils::time::{self, format_timestamp};

/// Register a new device in the catalog
pub async fn register_device(
    db: &DatabaseConnection,
    input: RegisterDeviceInput,
) -> Result<Device, DomainError> {
    let name = required_text("name", input.name)?;
    let tis_id = required_text("tis_id", input.tis_id)?;
    let category_id = input
        .category_id
        .ok_or_else(|| DomainError::Validation("category_id is required".to_string()))?;

    let status = input.status.unwrap_or(DeviceStatus::Available);
    if status == DeviceStatus::Loaned {
        return Err(DomainError::Validation(
            "a device becomes loaned only by opening a loan".to_string(),
        ));
    }

    let category = find_category(db, category_id).await?;
    ensure_unique_tis_id(db, &tis_id, None).await?;

    let now = format_timestamp(time::now());
    let new_device = device::ActiveModel {
        name: Set(name),
        tis_id: Set(tis_id.clone()),
        category_id: Set(category_id),
        details: Set(input.details),
        notes: Set(input.notes),
        status: Set(status.as_str().to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = new_device
        .insert(db)
        .await
        .map_err(|e| unique_violation(e, || duplicate_tis_id(&tis_id)))?;
    tracing::info!(
        "Device {} ({}) registered in category '{}'",
        saved.id,
        saved.tis_id,
        category.name
    );

    with_category_name(saved, Some(category))
}

/// Replace a device's descriptive fields. Status is never touched here.
pub async fn update_device(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateDeviceInput,
) -> Result<Device, DomainError> {
    let name = required_text("name", input.name)?;
    let tis_id = required_text("tis_id", input.tis_id)?;
    let category_id = input
        .category_id
        .ok_or_else(|| DomainError::Validation("category_id is required".to_string()))?;

    let existing = DeviceEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", id))?;

    let category = find_category(db, category_id).await?;
    ensure_unique_tis_id(db, &tis_id, Some(id)).await?;

    let mut active: device::ActiveModel = existing.into();
    active.name = Set(name);
    active.tis_id = Set(tis_id.clone());
    active.category_id = Set(category_id);
    active.details = Set(input.details);
    active.notes = Set(input.notes);
    active.updated_at = Set(format_timestamp(time::now()));

    let updated = active
        .update(db)
        .await
        .map_err(|e| unique_violation(e, || duplicate_tis_id(&tis_id)))?;

    with_category_name(updated, Some(category))
}

/// Client-requested status change (repair, retirement, reinstatement).
///
/// Moves into or out of `loaned` are rejected; those belong to the loan
/// lifecycle.
pub async fn set_status(
    db: &DatabaseConnection,
    id: i32,
    target: DeviceStatus,
) -> Result<Device, DomainError> {
    let txn = db.begin().await?;

    let current = DeviceEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", id))?
        .device_status()?;

    let needs_write = current
        .check_transition(target, StatusOrigin::Client)
        .inspect_err(|e| tracing::warn!("Rejected status change on device {}: {}", id, e))?;

    if needs_write && !compare_and_set_status(&txn, id, current, target).await? {
        return Err(DomainError::InvalidTransition(format!(
            "device {} changed status concurrently",
            id
        )));
    }

    let device = load_device(&txn, id).await?;
    txn.commit().await?;

    if needs_write {
        tracing::info!("Device {} status {} -> {}", id, current, target);
    }

    Ok(device)
}

/// Administrative delete of a device without loan history
pub async fn delete_device(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    let status = DeviceEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", id))?
        .device_status()?;

    if status == DeviceStatus::Loaned {
        return Err(DomainError::InvalidTransition(format!(
            "device {} is on an open loan",
            id
        )));
    }

    let loans = Loan::find()
        .filter(loan::Column::DeviceId.eq(id))
        .count(&txn)
        .await?;
    if loans > 0 {
        return Err(DomainError::Validation(format!(
            "device {} has {} loan(s) on record; retire it instead",
            id, loans
        )));
    }

    DeviceEntity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    tracing::info!("Device {} deleted", id);

    Ok(())
}

/// Claim an available device for a new loan.
///
/// The conditional update is the first write of the caller's transaction;
/// whoever loses the race sees zero affected rows.
pub(crate) async fn claim_for_loan<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<device::Model, DomainError> {
    let claimed =
        compare_and_set_status(conn, id, DeviceStatus::Available, DeviceStatus::Loaned).await?;

    let model = DeviceEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", id))?;

    if !claimed {
        let status = model.device_status()?;
        tracing::warn!("Device {} requested for loan while {}", id, status);
        return Err(DomainError::DeviceUnavailable {
            device_id: id,
            status,
        });
    }

    Ok(model)
}

/// Hand a device back from its loan as `available` or `damaged`.
pub(crate) async fn release_from_loan<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    target: DeviceStatus,
) -> Result<(), DomainError> {
    DeviceStatus::Loaned.check_transition(target, StatusOrigin::Lifecycle)?;

    if compare_and_set_status(conn, id, DeviceStatus::Loaned, target).await? {
        return Ok(());
    }

    let status = DeviceEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", id))?
        .device_status()?;

    Err(DomainError::InvalidTransition(format!(
        "device {} is {} and cannot be returned as {}",
        id, status, target
    )))
}

/// Device with its category name
pub(crate) async fn load_device<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Device, DomainError> {
    let (model, category) = DeviceEntity::find_by_id(id)
        .find_also_related(DeviceCategory)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Device", id))?;

    with_category_name(model, category)
}

async fn compare_and_set_status<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    expected: DeviceStatus,
    target: DeviceStatus,
) -> Result<bool, DomainError> {
    let result = DeviceEntity::update_many()
        .col_expr(device::Column::Status, Expr::value(target.as_str()))
        .col_expr(
            device::Column::UpdatedAt,
            Expr::value(format_timestamp(time::now())),
        )
        .filter(device::Column::Id.eq(id))
        .filter(device::Column::Status.eq(expected.as_str()))
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

async fn find_category<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<device_category::Model, DomainError> {
    DeviceCategory::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", id))
}

async fn ensure_unique_tis_id<C: ConnectionTrait>(
    conn: &C,
    tis_id: &str,
    except: Option<i32>,
) -> Result<(), DomainError> {
    let mut query = DeviceEntity::find().filter(device::Column::TisId.eq(tis_id));
    if let Some(id) = except {
        query = query.filter(device::Column::Id.ne(id));
    }

    if query.one(conn).await?.is_some() {
        return Err(DomainError::Validation(duplicate_tis_id(tis_id)));
    }

    Ok(())
}

fn duplicate_tis_id(tis_id: &str) -> String {
    format!("TISID '{}' is already registered", tis_id)
}

fn with_category_name(
    model: device::Model,
    category: Option<device_category::Model>,
) -> Result<Device, DomainError> {
    let mut device = Device::try_from(model)?;
    device.category_name = category.map(|c| c.name);
    Ok(device)
}
