//! Category Service - penalty schedules per device category

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use super::{required_text, unique_violation};
use crate::domain::{Category, CategoryInput, DomainError};
use crate::models::device::{self, Entity as Device};
use crate::models::device_category::{self, Entity as DeviceCategory};
use crate::utils::money::{checked_amount, to_minor_units};
use crate::utils::time::{self, format_timestamp};

/// Create a new category
pub async fn create_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<Category, DomainError> {
    let name = required_text("name", input.name)?;
    let daily_late_rate = checked_amount("daily_late_rate", input.daily_late_rate)?;
    let damage_fee = checked_amount("damage_fee", input.damage_fee)?;

    let existing = DeviceCategory::find()
        .filter(device_category::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(DomainError::Validation(duplicate_name(&name)));
    }

    let now = format_timestamp(time::now());
    let category = device_category::ActiveModel {
        name: Set(name.clone()),
        daily_late_rate_cents: Set(to_minor_units(daily_late_rate)?),
        damage_fee_cents: Set(to_minor_units(damage_fee)?),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let saved = category
        .insert(db)
        .await
        .map_err(|e| unique_violation(e, || duplicate_name(&name)))?;
    tracing::info!("Category {} '{}' created", saved.id, saved.name);

    Category::try_from(saved)
}

/// Delete a category that no device references
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    DeviceCategory::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", id))?;

    let devices = Device::find()
        .filter(device::Column::CategoryId.eq(id))
        .count(db)
        .await?;
    if devices > 0 {
        return Err(DomainError::Validation(format!(
            "category {} is still used by {} device(s)",
            id, devices
        )));
    }

    DeviceCategory::delete_by_id(id).exec(db).await?;
    tracing::info!("Category {} deleted", id);

    Ok(())
}

fn duplicate_name(name: &str) -> String {
    format!("category '{}' already exists", name)
}
